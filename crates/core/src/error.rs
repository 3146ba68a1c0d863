//! Error types for loading material tables and constructing models.

use ndarray::Array1;
use thiserror::Error;

use crate::{interpolation::InterpError, material::MaterialClass};

/// Errors that can occur while loading or validating a material table.
///
/// All of these are fatal: no partially loaded table is ever produced.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table's class tag does not match the model it is loaded for.
    #[error("material table is tagged `{found}`, expected `{expected}`")]
    ClassMismatch {
        expected: MaterialClass,
        found: MaterialClass,
    },

    /// The table defines no materials.
    #[error("material table contains no materials")]
    Empty,

    /// Two records share the same id.
    #[error("material `{id}` is defined more than once")]
    DuplicateMaterial { id: String },

    /// A scalar parameter is outside its physical domain.
    #[error("material `{id}`: parameter `{param}` has invalid value {value}")]
    InvalidParam {
        id: String,
        param: &'static str,
        value: f64,
    },

    /// The material class requires an interpolation surface but none was given.
    #[error("material `{id}` has no interpolation surface")]
    MissingSurface { id: String },

    /// The interpolation data is malformed before it reaches the interpolant.
    #[error("material `{id}`: {reason}")]
    InvalidSurface { id: String, reason: String },

    /// The interpolation surface could not be constructed.
    #[error("material `{id}`: {source}")]
    Interpolation {
        id: String,
        #[source]
        source: InterpError,
    },

    /// The table definition is not valid JSON for this material class.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The table file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Create an interpolation failure with the material id as context.
    pub fn interpolation(id: impl Into<String>, source: InterpError) -> Self {
        Self::Interpolation {
            id: id.into(),
            source,
        }
    }
}

/// Errors that can occur while constructing or calling a loss model.
///
/// Physically out-of-range operating points are never reported here; they are
/// encoded in the returned validity vectors instead.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A sample references a material id that is not in the table.
    #[error("sample {sample} references unknown material `{id}`")]
    UnknownMaterial { sample: usize, id: String },

    /// A per-sample input does not match the model's sample count.
    #[error("`{name}` has length {found}, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    /// A per-sample matrix input has the wrong shape.
    #[error("`{name}` has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: [usize; 2],
        found: [usize; 2],
    },

    /// A construction-time per-sample input is outside its physical domain.
    #[error("`{name}` entry {index} has invalid value {value}")]
    InvalidInput {
        name: &'static str,
        index: usize,
        value: f64,
    },

    /// A model configuration value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Interpolation(#[from] InterpError),
}

impl ModelError {
    /// Checks that a per-sample input has exactly `expected` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LengthMismatch`] if the lengths differ.
    pub fn check_length(name: &'static str, expected: usize, found: usize) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                name,
                expected,
                found,
            })
        }
    }

    /// Checks that every entry of a construction-time input is finite and
    /// accepted by `ok`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] for the first rejected entry.
    pub fn check_domain(
        name: &'static str,
        values: &Array1<f64>,
        ok: impl Fn(f64) -> bool,
    ) -> Result<(), Self> {
        match values
            .iter()
            .position(|&value| !(value.is_finite() && ok(value)))
        {
            Some(index) => Err(Self::InvalidInput {
                name,
                index,
                value: values[index],
            }),
            None => Ok(()),
        }
    }
}
