use ninterp::error::{InterpolateError, ValidateError};
use thiserror::Error;

use super::AxisScale;

#[derive(Error, Debug)]
pub enum InterpError {
    #[error(transparent)]
    Validation(#[from] ValidateError),
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
    #[error("axis `{axis}` has no points")]
    EmptyAxis { axis: &'static str },
    #[error("axis `{axis}` is not finite in {scale} space")]
    NonFiniteAxis {
        axis: &'static str,
        scale: AxisScale,
    },
    #[error("axis `{axis}` is not strictly increasing")]
    Unsorted { axis: &'static str },
    #[error("surface has {found} axes, at most {max} are supported")]
    TooManyAxes { found: usize, max: usize },
    #[error("values have shape {found:?}, axes require {expected:?}")]
    Shape {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("tabulated values are not finite in {scale} space")]
    NonFiniteValues { scale: AxisScale },
    #[error("query has {found} coordinates, surface has {expected} axes")]
    Dimension { expected: usize, found: usize },
}
