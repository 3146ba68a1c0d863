use std::fmt;

use ndarray::Array1;

use crate::Violations;

use super::InterpError;

/// Space in which an axis (or a tabulated value) is interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    /// Interpolate on `log10(x)`; only strictly positive values are valid.
    Log10,
}

impl AxisScale {
    /// Maps a physical value into interpolation space.
    #[must_use]
    pub fn forward(self, x: f64) -> f64 {
        match self {
            AxisScale::Linear => x,
            AxisScale::Log10 => x.log10(),
        }
    }

    /// Maps a value from interpolation space back to physical units.
    #[must_use]
    pub fn inverse(self, x: f64) -> f64 {
        match self {
            AxisScale::Linear => x,
            AxisScale::Log10 => 10.0_f64.powf(x),
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisScale::Linear => f.write_str("linear"),
            AxisScale::Log10 => f.write_str("log10"),
        }
    }
}

/// A named, strictly increasing grid axis.
///
/// Points are stored in interpolation space (see [`AxisScale`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: &'static str,
    scale: AxisScale,
    points: Array1<f64>,
}

impl Axis {
    /// Creates an axis from points given in physical units.
    ///
    /// # Errors
    ///
    /// Fails if the axis is empty, if any point is not finite once mapped into
    /// `scale` space (e.g. a non-positive value on a log axis), or if the
    /// points are not strictly increasing.
    pub fn new(
        name: &'static str,
        scale: AxisScale,
        points: impl Into<Array1<f64>>,
    ) -> Result<Self, InterpError> {
        let points = points.into().mapv(|x| scale.forward(x));

        if points.is_empty() {
            return Err(InterpError::EmptyAxis { axis: name });
        }
        if points.iter().any(|x| !x.is_finite()) {
            return Err(InterpError::NonFiniteAxis { axis: name, scale });
        }
        if points.windows(2).into_iter().any(|w| w[0] >= w[1]) {
            return Err(InterpError::Unsorted { axis: name });
        }

        Ok(Self {
            name,
            scale,
            points,
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn scale(&self) -> AxisScale {
        self.scale
    }

    /// Grid points in interpolation space.
    #[must_use]
    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lower bound in physical units.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.scale.inverse(self.lo())
    }

    /// Upper bound in physical units.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.scale.inverse(self.hi())
    }

    fn lo(&self) -> f64 {
        self.points[0]
    }

    fn hi(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Maps a physical query into interpolation space and clamps it to the axis.
    ///
    /// A query that cannot be mapped to a finite value is replaced by the
    /// lower bound and flagged as both clamped and non-finite.
    pub(crate) fn clamp(&self, x: f64) -> (f64, Violations) {
        let mapped = self.scale.forward(x);
        if !mapped.is_finite() {
            (self.lo(), Violations::CLAMPED | Violations::NON_FINITE)
        } else if mapped < self.lo() {
            (self.lo(), Violations::CLAMPED)
        } else if mapped > self.hi() {
            (self.hi(), Violations::CLAMPED)
        } else {
            (mapped, Violations::empty())
        }
    }

    /// Clamps a physical query and returns the result in physical units.
    ///
    /// In-range queries are returned unchanged, bit for bit.
    #[must_use]
    pub fn clamp_physical(&self, x: f64) -> (f64, Violations) {
        let (mapped, violations) = self.clamp(x);
        if violations.is_empty() {
            (x, violations)
        } else {
            (self.scale.inverse(mapped), violations)
        }
    }
}
