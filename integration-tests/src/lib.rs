//! Shared fixtures for the cross-crate scenario tests.

use std::{path::PathBuf, sync::Arc};

use magloss_core::{MaterialKind, MaterialSet, TableError};
use magloss_models::{CoreMaterial, InsulationMaterial, WindingMaterial};

/// Exponents and coefficient of the synthetic `power_law` core material.
///
/// Its loss map is `P = K·f^ALPHA·B^BETA` with no bias or temperature
/// dependence. `alpha_one` and `alpha_two` use the same `K` and `BETA` with
/// `α = 1` and `α = 2`.
pub mod power_law {
    pub const K: f64 = 2.0;
    pub const ALPHA: f64 = 1.3;
    pub const BETA: f64 = 2.5;

    /// Loss density of a power law with the fixture's `K` and `BETA`.
    #[must_use]
    pub fn loss_density(alpha: f64, f: f64, b: f64) -> f64 {
        K * f.powf(alpha) * b.powf(BETA)
    }
}

/// Path of a JSON table in the `fixtures` directory.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn load<K: MaterialKind>(name: &str) -> Result<Arc<MaterialSet<K>>, TableError> {
    MaterialSet::from_path(fixture_path(name)).map(Arc::new)
}

/// Ferrite tables `power_law`, `alpha_one` and `alpha_two`.
///
/// Axes: `f ∈ [1e4, 1e6]`, `b_ac_peak ∈ [0.01, 0.3]`, `b_dc ∈ [0, 0.1]`,
/// `t ∈ [25, 100]`. Saturation limit 0.35 T.
///
/// # Errors
///
/// Fails if the fixture cannot be read or is invalid.
pub fn core_materials() -> Result<Arc<MaterialSet<CoreMaterial>>, TableError> {
    load("core.json")
}

/// Litz tables `litz_flat` (σ = 23.5e6 S/m on `t ∈ [20, 150]`) and
/// `copper` (σ falling from 58e6 to 44.6e6 S/m on `t ∈ [20, 100]`).
///
/// # Errors
///
/// Fails if the fixture cannot be read or is invalid.
pub fn winding_materials() -> Result<Arc<MaterialSet<WindingMaterial>>, TableError> {
    load("winding.json")
}

/// Insulation tables `epoxy` and `kapton`.
///
/// # Errors
///
/// Fails if the fixture cannot be read or is invalid.
pub fn insulation_materials() -> Result<Arc<MaterialSet<InsulationMaterial>>, TableError> {
    load("iso.json")
}
