//! Error types for Trellis
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{BundleError, GraphError};
use crate::domain::value_objects::FieldKey;

/// Result type alias for Trellis operations
pub type TrellisResult<T> = Result<T, TrellisError>;

/// Main error type for Trellis operations
#[derive(Error, Debug)]
pub enum TrellisError {
    /// Discovery root (or an explicit entry directory) does not exist
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Explicit override path or derived default paths do not exist
    #[error("file not found (tried {})", display_paths(.attempted))]
    FileNotFound { attempted: Vec<PathBuf> },

    /// Explicit entry file does not end in a recognized source extension
    #[error("invalid extension for {path}: expected one of .ts, .js")]
    InvalidExtension { path: PathBuf },

    /// Both an entry file and an entry directory were supplied
    #[error("conflicting options: {first} and {second} are mutually exclusive")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },

    /// No base directory configured and no caller location available
    #[error(
        "cannot derive a default resolver directory: {reason} (set `discovery.base_dir` or pass an entry directory)"
    )]
    AmbiguousOrigin { reason: String },

    /// Two sources claim the same unit resolver field
    #[error("duplicate unit resolver for {field}: {existing} already claimed by data source '{existing_source}', rejected {incoming} from '{incoming_source}'")]
    DuplicateUnitResolver {
        field: FieldKey,
        existing_source: String,
        existing: PathBuf,
        incoming_source: String,
        incoming: PathBuf,
    },

    /// A field is claimed both as a unit resolver and as a pipeline
    #[error("{field} is declared both as a unit resolver and as a pipeline directory")]
    ResolverKindConflict { field: FieldKey },

    /// Two declarations map to the same resource id
    #[error("{kind} id '{id}' for {incoming} collides with {existing}")]
    ResourceIdCollision {
        kind: &'static str,
        id: String,
        existing: String,
        incoming: String,
    },

    /// Two stages of one data source share an order number
    #[error("pipeline {field}: stages {} of data source '{data_source}' share order {order}", .stages.join(", "))]
    DuplicateStageOrder {
        field: FieldKey,
        data_source: String,
        order: u64,
        stages: Vec<String>,
    },

    /// Stage name repeated within one data source of one pipeline
    #[error("pipeline {field}: stage '{stage}' is declared more than once for data source '{data_source}'")]
    DuplicateStageName {
        field: FieldKey,
        data_source: String,
        stage: String,
    },

    /// Bundling failure, propagated verbatim
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// Resource graph rejected an operation
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
