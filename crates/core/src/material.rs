//! Material-table definitions and the validated, immutable material set.

use std::{collections::HashSet, fmt, fs, path::Path};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{ModelError, SampleIndexer, Surface, TableError};

/// Material class tag carried by every material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    Core,
    Winding,
    Iso,
}

impl fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialClass::Core => f.write_str("core"),
            MaterialClass::Winding => f.write_str("winding"),
            MaterialClass::Iso => f.write_str("iso"),
        }
    }
}

/// Describes one class of material: its scalar parameters and its surface.
///
/// Implementors are zero-sized markers; the associated types carry the
/// class-specific table layout.
pub trait MaterialKind: Sized {
    /// Tag the table must carry to be loaded as this kind.
    const CLASS: MaterialClass;

    /// Constant scalar properties of one material.
    type Param: DeserializeOwned + fmt::Debug + Send + Sync;

    /// Raw interpolation data of one material, as found in the table.
    type Interp: DeserializeOwned + Send + Sync;

    /// Checks that every scalar parameter is in its physical domain.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidParam`] naming the first bad parameter.
    fn validate(id: &str, param: &Self::Param) -> Result<(), TableError>;

    /// Builds the material's interpolation surface, if the class has one.
    ///
    /// # Errors
    ///
    /// Fails if the class requires a surface and none is given, or if the
    /// interpolation data is malformed.
    fn surface(id: &str, interp: Option<Self::Interp>) -> Result<Option<Surface>, TableError>;
}

/// Placeholder interpolation data for classes without a surface.
///
/// Only an empty object deserializes into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoSurface {}

/// One material as it appears in a table definition.
#[derive(Deserialize)]
#[serde(bound = "", deny_unknown_fields)]
pub struct MaterialDef<K: MaterialKind> {
    pub id: String,
    pub param: K::Param,
    #[serde(default)]
    pub interp: Option<K::Interp>,
}

/// A material table as delivered by the characterization tooling.
///
/// ```json
/// { "type": "iso", "data": [{ "id": "epoxy", "param": { ... } }] }
/// ```
#[derive(Deserialize)]
#[serde(bound = "", deny_unknown_fields)]
pub struct MaterialTableDef<K: MaterialKind> {
    #[serde(rename = "type")]
    pub class: MaterialClass,
    pub data: Vec<MaterialDef<K>>,
}

impl<K: MaterialKind> MaterialTableDef<K> {
    /// Parses a table definition from a JSON string.
    ///
    /// # Errors
    ///
    /// Fails if the table is tagged with another class, or if the JSON does
    /// not match this kind's table layout.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        // The tag is checked first so a table of the wrong class is reported
        // as such rather than as a layout error.
        let ClassTag { class } = serde_json::from_str(json)?;
        if class != K::CLASS {
            return Err(TableError::ClassMismatch {
                expected: K::CLASS,
                found: class,
            });
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a table definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not match this kind's layout.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[derive(Deserialize)]
struct ClassTag {
    #[serde(rename = "type")]
    class: MaterialClass,
}

/// An immutable, validated material record.
pub struct MaterialRecord<K: MaterialKind> {
    id: String,
    param: K::Param,
    surface: Option<Surface>,
}

impl<K: MaterialKind> MaterialRecord<K> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn param(&self) -> &K::Param {
        &self.param
    }

    #[must_use]
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}

impl<K: MaterialKind> fmt::Debug for MaterialRecord<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialRecord")
            .field("id", &self.id)
            .field("param", &self.param)
            .field("surface", &self.surface)
            .finish()
    }
}

/// The set of materials a model can reference, in table order.
///
/// Built once from a [`MaterialTableDef`], never mutated afterwards, and meant
/// to be shared between models through an `Arc`.
pub struct MaterialSet<K: MaterialKind> {
    records: Vec<MaterialRecord<K>>,
}

impl<K: MaterialKind> MaterialSet<K> {
    /// Validates a table definition and builds its interpolation surfaces.
    ///
    /// # Errors
    ///
    /// Fails if the class tag does not match `K`, if the table is empty, if an
    /// id is repeated, or if any parameter or surface is invalid.
    pub fn new(def: MaterialTableDef<K>) -> Result<Self, TableError> {
        if def.class != K::CLASS {
            return Err(TableError::ClassMismatch {
                expected: K::CLASS,
                found: def.class,
            });
        }
        if def.data.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::with_capacity(def.data.len());
        let mut records = Vec::with_capacity(def.data.len());

        for MaterialDef { id, param, interp } in def.data {
            if !seen.insert(id.clone()) {
                return Err(TableError::DuplicateMaterial { id });
            }
            K::validate(&id, &param)?;
            let surface = K::surface(&id, interp)?;
            records.push(MaterialRecord { id, param, surface });
        }

        log::debug!("loaded {} {} materials", records.len(), K::CLASS);

        Ok(Self { records })
    }

    /// Parses and validates a table from a JSON string.
    ///
    /// # Errors
    ///
    /// See [`MaterialTableDef::from_json_str`] and [`MaterialSet::new`].
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        Self::new(MaterialTableDef::from_json_str(json)?)
    }

    /// Reads, parses and validates a table from a JSON file.
    ///
    /// # Errors
    ///
    /// See [`MaterialTableDef::from_path`] and [`MaterialSet::new`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        Self::new(MaterialTableDef::from_path(path)?)
    }

    #[must_use]
    pub fn records(&self) -> &[MaterialRecord<K>] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over material ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(MaterialRecord::id)
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MaterialRecord<K>> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Maps per-sample material ids onto rows of this set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownMaterial`] if any sample id is not in the set.
    pub fn indexer<S: AsRef<str>>(&self, sample_ids: &[S]) -> Result<SampleIndexer, ModelError> {
        let ids: Vec<&str> = self.ids().collect();
        SampleIndexer::new(&ids, sample_ids)
    }
}

impl<K: MaterialKind> fmt::Debug for MaterialSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialSet")
            .field("class", &K::CLASS)
            .field("records", &self.records)
            .finish()
    }
}

/// Checks a scalar parameter against its physical domain.
///
/// # Errors
///
/// Returns [`TableError::InvalidParam`] if `value` is not finite or `ok`
/// rejects it.
pub fn check_param(
    id: &str,
    param: &'static str,
    value: f64,
    ok: impl FnOnce(f64) -> bool,
) -> Result<(), TableError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(TableError::InvalidParam {
            id: id.to_owned(),
            param,
            value,
        })
    }
}
