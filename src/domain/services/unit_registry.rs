//! Unit resolver registry
//!
//! Unit resolvers are never aggregated: each field has at most one binding.
//! A second claim on the same field from another data source or another
//! file is rejected instead of overwriting the first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::ports::ResolverHandle;
use crate::domain::value_objects::FieldKey;
use crate::error::{TrellisError, TrellisResult};

/// A created unit resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitBinding {
    pub data_source: String,
    pub entry_path: PathBuf,
    pub handle: ResolverHandle,
}

/// Unit resolvers keyed by field
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: BTreeMap<FieldKey, UnitBinding>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &FieldKey) -> Option<&UnitBinding> {
        self.units.get(field)
    }

    pub fn contains(&self, field: &FieldKey) -> bool {
        self.units.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &UnitBinding)> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Check whether a claim may be created.
    ///
    /// Returns `Ok(true)` for a new field, `Ok(false)` when the identical
    /// binding already exists, and `DuplicateUnitResolver` otherwise.
    pub fn admit(
        &self,
        field: &FieldKey,
        data_source: &str,
        entry_path: &Path,
    ) -> TrellisResult<bool> {
        match self.units.get(field) {
            None => Ok(true),
            Some(existing)
                if existing.data_source == data_source && existing.entry_path == entry_path =>
            {
                Ok(false)
            }
            Some(existing) => Err(TrellisError::DuplicateUnitResolver {
                field: field.clone(),
                existing_source: existing.data_source.clone(),
                existing: existing.entry_path.clone(),
                incoming_source: data_source.to_string(),
                incoming: entry_path.to_path_buf(),
            }),
        }
    }

    pub(crate) fn insert(&mut self, field: FieldKey, binding: UnitBinding) {
        self.units.insert(field, binding);
    }
}
