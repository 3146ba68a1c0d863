//! Insulation property lookups.
//!
//! Insulation is treated as lossless, so this model only reports mass, cost
//! and temperature limits.

use std::sync::Arc;

use magloss_core::{
    MaterialClass, MaterialKind, MaterialSet, ModelError, NoSurface, Surface, TableError,
    material::check_param,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Marker for insulation material tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsulationMaterial;

/// Constant properties of an insulation material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsulationParams {
    /// Density [kg/m³].
    pub rho: f64,
    /// Cost per unit mass.
    pub kappa: f64,
    /// Fixed cost offset.
    pub c_offset: f64,
    /// Maximum operating temperature [°C].
    pub t_max: f64,
}

impl MaterialKind for InsulationMaterial {
    const CLASS: MaterialClass = MaterialClass::Iso;
    type Param = InsulationParams;
    type Interp = NoSurface;

    fn validate(id: &str, param: &InsulationParams) -> Result<(), TableError> {
        check_param(id, "rho", param.rho, |x| x > 0.0)?;
        check_param(id, "kappa", param.kappa, |x| x >= 0.0)?;
        check_param(id, "c_offset", param.c_offset, |x| x >= 0.0)?;
        check_param(id, "t_max", param.t_max, |_| true)
    }

    fn surface(id: &str, interp: Option<NoSurface>) -> Result<Option<Surface>, TableError> {
        match interp {
            None => Ok(None),
            Some(_) => Err(TableError::InvalidSurface {
                id: id.to_owned(),
                reason: "insulation materials take no interpolation data".to_owned(),
            }),
        }
    }
}

/// Vectorized insulation property model over a fixed set of samples.
#[derive(Debug)]
pub struct InsulationModel {
    volume: Array1<f64>,
    rho: Array1<f64>,
    kappa: Array1<f64>,
    c_offset: Array1<f64>,
    t_max: Array1<f64>,
}

impl InsulationModel {
    /// Creates a model for samples made of `material_ids` with insulation
    /// `volume` [m³].
    ///
    /// # Errors
    ///
    /// Fails if a sample references a material missing from `materials`, or
    /// if `volume` does not have one non-negative entry per sample.
    pub fn new<S: AsRef<str>>(
        materials: Arc<MaterialSet<InsulationMaterial>>,
        material_ids: &[S],
        volume: Array1<f64>,
    ) -> Result<Self, ModelError> {
        let indexer = materials.indexer(material_ids)?;
        ModelError::check_length("volume", indexer.len(), volume.len())?;
        ModelError::check_domain("volume", &volume, |v| v >= 0.0)?;

        log::debug!("insulation model: {} samples", indexer.len());

        let records = materials.records();
        let broadcast =
            |f: fn(&InsulationParams) -> f64| indexer.broadcast(records, |r| f(r.param()));

        Ok(Self {
            volume,
            rho: broadcast(|p| p.rho),
            kappa: broadcast(|p| p.kappa),
            c_offset: broadcast(|p| p.c_offset),
            t_max: broadcast(|p| p.t_max),
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.volume.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volume.is_empty()
    }

    /// Insulation mass [kg].
    #[must_use]
    pub fn get_mass(&self) -> Array1<f64> {
        &self.volume * &self.rho
    }

    /// Insulation cost: `volume·rho·kappa + c_offset`.
    #[must_use]
    pub fn get_cost(&self) -> Array1<f64> {
        &self.get_mass() * &self.kappa + &self.c_offset
    }

    /// Maximum operating temperature [°C].
    #[must_use]
    pub fn get_temperature_limit(&self) -> Array1<f64> {
        self.t_max.clone()
    }
}
