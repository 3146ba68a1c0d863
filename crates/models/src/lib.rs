//! Vectorized loss and property models for magnetic components.
//!
//! Every model is built once for a fixed set of `N` design samples from a
//! shared [`MaterialSet`](magloss_core::MaterialSet), a per-sample material
//! id and a per-sample volume. Getters take per-sample operating conditions
//! and return arrays of length `N`. Operating points outside a material's
//! tabulated range are never errors: they are clamped and reported through
//! the returned validity and [`Violations`](magloss_core::Violations) arrays.

mod config;
pub mod core_loss;
pub mod insulation;
pub mod physics;
pub mod winding;

pub use config::CoreLossConfig;
pub use core_loss::{CoreLossModel, CoreLosses, CoreMaterial, SteinmetzFit, SteinmetzParams};
pub use insulation::{InsulationMaterial, InsulationModel};
pub use winding::{LossBreakdown, WindingLossModel, WindingLosses, WindingMaterial};
