//! Typed descriptors produced by classifying snapshot entries

use std::path::PathBuf;

use crate::domain::value_objects::FieldKey;

/// A single-step resolver bound to exactly one data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResolverDescriptor {
    pub field: FieldKey,
    pub data_source: String,
    /// Absolute path of the handler file
    pub entry_path: PathBuf,
}

/// One function of a pipeline
///
/// `order` is the sort key; ties keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    pub field: FieldKey,
    pub order: u64,
    pub stage_name: String,
    pub data_source: String,
    /// Absolute path of the handler file
    pub entry_path: PathBuf,
}

/// A `Type.field/` directory together with what it holds for one data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDirectory {
    pub field: FieldKey,
    /// Absolute path of the directory
    pub path: PathBuf,
    /// Explicit `resolver.ts|js` wrapper, if present
    pub wrapper: Option<PathBuf>,
    /// Stage files matching the target data source, in snapshot order
    pub stages: Vec<StageDescriptor>,
}
