//! ResourceGraph port - the declarative model resolvers are created in
//!
//! The assembler never persists anything itself. It creates data sources,
//! resolvers and pipeline functions through this trait and updates the
//! ordered function list of pipeline resolvers as stages are merged.

use serde::Serialize;
use thiserror::Error;

use super::bundler::CodeRef;
use crate::domain::value_objects::FieldKey;

/// Handle to a registered data source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DataSourceHandle {
    name: String,
}

impl DataSourceHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to a unit or pipeline resolver resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolverHandle {
    id: String,
    field: FieldKey,
}

impl ResolverHandle {
    pub fn new(id: impl Into<String>, field: FieldKey) -> Self {
        Self {
            id: id.into(),
            field,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field(&self) -> &FieldKey {
        &self.field
    }
}

/// Handle to a pipeline function resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StageHandle {
    id: String,
    data_source: String,
}

impl StageHandle {
    pub fn new(id: impl Into<String>, data_source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_source: data_source.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }
}

/// What kind of resolver to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverKind {
    /// Single-step resolver bound to one data source
    Unit { data_source: DataSourceHandle },
    /// Pipeline resolver; stages are attached later with `set_pipeline`
    Pipeline,
}

/// Request to create a resolver resource
#[derive(Debug, Clone)]
pub struct ResolverSpec {
    pub id: String,
    pub field: FieldKey,
    pub kind: ResolverKind,
    pub code: CodeRef,
}

/// Request to create a pipeline function resource
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub id: String,
    pub name: String,
    pub data_source: DataSourceHandle,
    pub code: CodeRef,
}

/// Resource graph failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("resource '{id}' already exists")]
    DuplicateResource { id: String },

    #[error("unknown resource '{id}'")]
    UnknownResource { id: String },

    #[error("resolver '{id}' is not a pipeline resolver")]
    NotAPipeline { id: String },
}

/// Declarative infrastructure model
pub trait ResourceGraph {
    /// Whether a resolver resource with this id exists
    fn contains_resolver(&self, id: &str) -> bool;

    /// Whether a pipeline function resource with this id exists
    fn contains_function(&self, id: &str) -> bool;

    /// Register a data source (idempotent per name)
    fn add_data_source(&mut self, name: &str) -> Result<DataSourceHandle, GraphError>;

    /// Create a resolver resource. Fails if the id already exists.
    fn create_resolver(&mut self, spec: ResolverSpec) -> Result<ResolverHandle, GraphError>;

    /// Create a pipeline function resource. Fails if the id already exists.
    fn create_function(&mut self, spec: FunctionSpec) -> Result<StageHandle, GraphError>;

    /// Replace the ordered function list of a pipeline resolver
    fn set_pipeline(
        &mut self,
        resolver: &ResolverHandle,
        functions: &[StageHandle],
    ) -> Result<(), GraphError>;
}
