//! Material tables, sample indexing and clamped interpolation for
//! magnetic-component loss models.
//!
//! The types in this crate are shared infrastructure for the loss models in
//! `magloss-models`:
//! - [`MaterialSet`] holds validated, immutable per-material records.
//! - [`SampleIndexer`] maps per-sample material ids onto record rows and
//!   broadcasts per-material constants into per-sample arrays.
//! - [`Interpolator`] evaluates each sample's material surface, clamping
//!   out-of-range queries and flagging them in a [`Violations`] mask.

mod error;
mod indexer;
pub mod interpolation;
pub mod material;
mod validity;

pub use error::{ModelError, TableError};
pub use indexer::SampleIndexer;
pub use interpolation::{Axis, AxisScale, InterpError, Interpolator, Surface};
pub use material::{
    MaterialClass, MaterialDef, MaterialKind, MaterialRecord, MaterialSet, MaterialTableDef,
    NoSurface,
};
pub use validity::{Flagged, Violations, merge_violations};
