//! Clamped, per-sample interpolation over material surfaces.

mod axis;
mod error;
mod surface;

use std::sync::Arc;

use ndarray::{Array1, ArrayView1, Zip};

pub use axis::{Axis, AxisScale};
pub use error::InterpError;
pub use surface::{MAX_AXES, Surface};

use crate::{Flagged, MaterialKind, MaterialSet, ModelError, SampleIndexer, TableError, Violations};

/// Evaluates each sample's material surface in one pass.
///
/// Holds a shared handle to the material set and the per-sample material
/// index, so one interpolator serves every call on a model's sample set.
pub struct Interpolator<K: MaterialKind> {
    materials: Arc<MaterialSet<K>>,
    material_index: Array1<usize>,
}

impl<K: MaterialKind> Interpolator<K> {
    /// Creates an interpolator for the samples described by `indexer`.
    ///
    /// # Errors
    ///
    /// Fails if any material in the set has no interpolation surface.
    pub fn new(materials: Arc<MaterialSet<K>>, indexer: &SampleIndexer) -> Result<Self, ModelError> {
        surfaces(&materials)?;
        Ok(Self {
            materials,
            material_index: indexer.material_index().clone(),
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.material_index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.material_index.is_empty()
    }

    /// Interpolates every sample at the given query coordinates.
    ///
    /// `query` holds one array per surface axis, each with one entry per
    /// sample, in physical units. Out-of-range coordinates are clamped to the
    /// axis boundary and the sample is flagged [`Violations::CLAMPED`].
    ///
    /// # Errors
    ///
    /// Fails if a query array does not have one entry per sample, or if the
    /// number of query arrays does not match the surface dimension.
    pub fn evaluate(&self, query: &[ArrayView1<'_, f64>]) -> Result<Flagged, ModelError> {
        let n = self.len();
        for coords in query {
            ModelError::check_length("interpolation query", n, coords.len())?;
        }

        let surfaces = surfaces(&self.materials)?;
        for surface in &surfaces {
            if surface.axes().len() != query.len() {
                return Err(InterpError::Dimension {
                    expected: surface.axes().len(),
                    found: query.len(),
                }
                .into());
            }
        }

        let mut value = Array1::zeros(n);
        let mut violations = Array1::from_elem(n, Violations::empty());
        let mut failure: Option<InterpError> = None;

        Zip::indexed(&mut value)
            .and(&mut violations)
            .and(&self.material_index)
            .for_each(|i, value, violations, &row| {
                if failure.is_some() {
                    return;
                }
                let mut point = [0.0; MAX_AXES];
                for (slot, coords) in point.iter_mut().zip(query) {
                    *slot = coords[i];
                }
                match surfaces[row].evaluate(&point[..query.len()]) {
                    Ok(evaluated) => (*value, *violations) = evaluated,
                    Err(err) => failure = Some(err),
                }
            });

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(Flagged { value, violations }),
        }
    }

    /// Clamps one query axis per sample without interpolating.
    ///
    /// Returns the clamped coordinates in physical units; in-range entries are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Fails if `query` does not have one entry per sample or if `axis` is not
    /// an axis of every surface.
    pub fn clamp_axis(&self, axis: usize, query: ArrayView1<'_, f64>) -> Result<Flagged, ModelError> {
        ModelError::check_length("clamp query", self.len(), query.len())?;

        let surfaces = surfaces(&self.materials)?;
        let axes = surfaces
            .iter()
            .map(|s| {
                s.axes().get(axis).ok_or(InterpError::Dimension {
                    expected: s.axes().len(),
                    found: axis + 1,
                })
            })
            .collect::<Result<Vec<&Axis>, _>>()?;

        let mut value = Array1::zeros(self.len());
        let mut violations = Array1::from_elem(self.len(), Violations::empty());
        Zip::from(&mut value)
            .and(&mut violations)
            .and(&self.material_index)
            .and(query)
            .for_each(|value, violations, &row, &x| {
                (*value, *violations) = axes[row].clamp_physical(x);
            });

        Ok(Flagged { value, violations })
    }
}

fn surfaces<K: MaterialKind>(materials: &MaterialSet<K>) -> Result<Vec<&Surface>, TableError> {
    materials
        .records()
        .iter()
        .map(|record| {
            record.surface().ok_or_else(|| TableError::MissingSurface {
                id: record.id().to_owned(),
            })
        })
        .collect()
}
