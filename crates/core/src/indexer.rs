use std::collections::HashMap;

use ndarray::Array1;

use crate::ModelError;

/// Maps per-sample material ids onto rows of a material table.
///
/// The id-to-row map is built once over the table; each sample is then
/// resolved in amortized constant time. Per-material constants are
/// broadcast into per-sample arrays with [`SampleIndexer::gather`] and
/// [`SampleIndexer::broadcast`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIndexer {
    material_index: Array1<usize>,
    n_materials: usize,
}

impl SampleIndexer {
    /// Resolves every sample id against the table ids.
    ///
    /// If `table_ids` repeats an id, the first occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownMaterial`] for the first sample whose id is
    /// not among `table_ids`.
    pub fn new<I, S>(table_ids: &[I], sample_ids: &[S]) -> Result<Self, ModelError>
    where
        I: AsRef<str>,
        S: AsRef<str>,
    {
        let mut rows: HashMap<&str, usize> = HashMap::with_capacity(table_ids.len());
        for (row, id) in table_ids.iter().enumerate() {
            rows.entry(id.as_ref()).or_insert(row);
        }

        let material_index = sample_ids
            .iter()
            .enumerate()
            .map(|(sample, id)| {
                let id = id.as_ref();
                rows.get(id).copied().ok_or_else(|| ModelError::UnknownMaterial {
                    sample,
                    id: id.to_owned(),
                })
            })
            .collect::<Result<Array1<usize>, _>>()?;

        Ok(Self {
            material_index,
            n_materials: table_ids.len(),
        })
    }

    /// Table row referenced by each sample.
    #[must_use]
    pub fn material_index(&self) -> &Array1<usize> {
        &self.material_index
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

    /// Number of rows in the table the samples were resolved against.
    #[must_use]
    pub fn n_materials(&self) -> usize {
        self.n_materials
    }

    /// Gathers one value per material into one value per sample.
    ///
    /// # Panics
    ///
    /// Panics if `per_material` is shorter than the table.
    #[must_use]
    pub fn gather<T: Clone>(&self, per_material: &[T]) -> Array1<T> {
        assert!(
            per_material.len() >= self.n_materials,
            "expected {} per-material values, got {}",
            self.n_materials,
            per_material.len()
        );
        self.material_index.mapv(|row| per_material[row].clone())
    }

    /// Broadcasts a scalar property of each record into a per-sample array.
    ///
    /// # Panics
    ///
    /// Panics if `records` is shorter than the table.
    #[must_use]
    pub fn broadcast<R>(&self, records: &[R], property: impl Fn(&R) -> f64) -> Array1<f64> {
        let per_material: Vec<f64> = records.iter().map(property).collect();
        self.gather(&per_material)
    }

    /// Number of samples referencing each table row.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_materials];
        for &row in &self.material_index {
            counts[row] += 1;
        }
        counts
    }
}
