use std::fmt;

use ndarray::{Array1, ArrayD, Axis as NdAxis};
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, InterpNDOwned, Interpolator},
    strategy::enums::{Strategy1DEnum, StrategyNDEnum},
};

use crate::Violations;

use super::{Axis, AxisScale, InterpError};

/// Largest number of axes a surface may span.
pub const MAX_AXES: usize = 4;

enum Kernel {
    Constant(f64),
    One(Interp1DOwned<f64, Strategy1DEnum>),
    Many(InterpNDOwned<f64, StrategyNDEnum>),
}

impl Kernel {
    fn interpolate(&self, point: &[f64]) -> Result<f64, InterpError> {
        match self {
            Kernel::Constant(value) => Ok(*value),
            Kernel::One(interp) => interp.interpolate(point).map_err(Into::into),
            Kernel::Many(interp) => interp.interpolate(point).map_err(Into::into),
        }
    }
}

/// A linear interpolation surface over a rectangular grid.
///
/// Queries are clamped per axis before evaluation, so the surface never
/// extrapolates. Each evaluation reports whether any coordinate was clamped.
///
/// Axes with a single point are folded out of the interpolant: the value is
/// taken at that point, and any query that differs from it is clamped.
pub struct Surface {
    axes: Vec<Axis>,
    /// Indices of the axes that span the interpolant (length > 1).
    active: Vec<usize>,
    value_scale: AxisScale,
    kernel: Kernel,
}

impl Surface {
    /// Builds a surface from its axes and tabulated values.
    ///
    /// `values` is given in physical units with one dimension per axis, in
    /// axis order, and is stored in `value_scale` space.
    ///
    /// # Errors
    ///
    /// Fails if there are too many axes, if the value shape does not match the
    /// axis lengths, if any value is not finite in `value_scale` space, or if
    /// the underlying interpolant rejects the grid.
    pub fn new(
        axes: Vec<Axis>,
        values: ArrayD<f64>,
        value_scale: AxisScale,
    ) -> Result<Self, InterpError> {
        if axes.len() > MAX_AXES {
            return Err(InterpError::TooManyAxes {
                found: axes.len(),
                max: MAX_AXES,
            });
        }

        let expected: Vec<usize> = axes.iter().map(Axis::len).collect();
        if values.shape() != expected.as_slice() {
            return Err(InterpError::Shape {
                expected,
                found: values.shape().to_vec(),
            });
        }

        let mut values = values.mapv(|v| value_scale.forward(v));
        if values.iter().any(|v| !v.is_finite()) {
            return Err(InterpError::NonFiniteValues { scale: value_scale });
        }

        // Fold degenerate axes, last to first so earlier indices stay valid.
        for (i, axis) in axes.iter().enumerate().rev() {
            if axis.len() == 1 {
                log::warn!(
                    "axis `{}` has a single point, queries off that point are clamped",
                    axis.name()
                );
                values = values.index_axis_move(NdAxis(i), 0);
            }
        }

        let active: Vec<usize> = (0..axes.len()).filter(|&i| axes[i].len() > 1).collect();
        let mut grid: Vec<Array1<f64>> = active.iter().map(|&i| axes[i].points().clone()).collect();

        let kernel = match grid.len() {
            0 => Kernel::Constant(values.iter().copied().next().unwrap_or_default()),
            1 => Kernel::One(Interp1DOwned::new(
                grid.remove(0),
                values.iter().copied().collect::<Array1<f64>>(),
                ninterp::strategy::Linear.into(),
                Extrapolate::Clamp,
            )?),
            _ => Kernel::Many(InterpNDOwned::new(
                grid,
                values,
                ninterp::strategy::Linear.into(),
                Extrapolate::Clamp,
            )?),
        };

        Ok(Self {
            axes,
            active,
            value_scale,
            kernel,
        })
    }

    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    #[must_use]
    pub fn value_scale(&self) -> AxisScale {
        self.value_scale
    }

    /// Evaluates the surface at a point given in physical units.
    ///
    /// Returns the interpolated value in physical units and the violations
    /// raised while clamping the query.
    ///
    /// # Errors
    ///
    /// Fails if `point` does not have one coordinate per axis.
    pub fn evaluate(&self, point: &[f64]) -> Result<(f64, Violations), InterpError> {
        if point.len() != self.axes.len() {
            return Err(InterpError::Dimension {
                expected: self.axes.len(),
                found: point.len(),
            });
        }

        let mut violations = Violations::empty();
        let mut clamped = [0.0; MAX_AXES];
        for (axis, (&x, slot)) in self.axes.iter().zip(point.iter().zip(clamped.iter_mut())) {
            let (mapped, v) = axis.clamp(x);
            *slot = mapped;
            violations |= v;
        }

        let mut query = [0.0; MAX_AXES];
        for (slot, &i) in query.iter_mut().zip(&self.active) {
            *slot = clamped[i];
        }

        let value = self.kernel.interpolate(&query[..self.active.len()])?;
        Ok((self.value_scale.inverse(value), violations))
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("axes", &self.axes)
            .field("value_scale", &self.value_scale)
            .finish_non_exhaustive()
    }
}
