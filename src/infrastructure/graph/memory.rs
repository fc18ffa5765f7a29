//! In-memory resource graph
//!
//! Records every declarative resource created during assembly and renders
//! them as a serializable manifest.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ports::{
    CodeRef, DataSourceHandle, FunctionSpec, GraphError, ResolverHandle, ResolverKind,
    ResolverSpec, ResourceGraph, StageHandle,
};

/// A resolver resource as recorded in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverRecord {
    pub id: String,
    pub type_name: String,
    pub field_name: String,
    pub kind: RecordKind,
    pub code: CodeRef,
}

/// Unit binding or ordered pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordKind {
    Unit { data_source: String },
    Pipeline { functions: Vec<String> },
}

/// A pipeline function resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    pub id: String,
    pub name: String,
    pub data_source: String,
    pub code: CodeRef,
}

/// Serializable snapshot of the graph
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub data_sources: Vec<String>,
    pub resolvers: Vec<ResolverRecord>,
    pub functions: Vec<FunctionRecord>,
}

/// Resource graph held in ordered maps
#[derive(Debug, Default)]
pub struct InMemoryResourceGraph {
    data_sources: Vec<String>,
    resolvers: BTreeMap<String, ResolverRecord>,
    functions: BTreeMap<String, FunctionRecord>,
}

impl InMemoryResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data sources in registration order
    pub fn data_sources(&self) -> &[String] {
        &self.data_sources
    }

    pub fn resolver(&self, id: &str) -> Option<&ResolverRecord> {
        self.resolvers.get(id)
    }

    pub fn resolvers(&self) -> impl Iterator<Item = &ResolverRecord> {
        self.resolvers.values()
    }

    pub fn function(&self, id: &str) -> Option<&FunctionRecord> {
        self.functions.get(id)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.functions.values()
    }

    /// Ordered function ids of a pipeline resolver
    pub fn pipeline(&self, resolver_id: &str) -> Option<&[String]> {
        match &self.resolvers.get(resolver_id)?.kind {
            RecordKind::Pipeline { functions } => Some(functions),
            RecordKind::Unit { .. } => None,
        }
    }

    pub fn manifest(&self) -> Manifest {
        Manifest {
            generated_at: Utc::now(),
            data_sources: self.data_sources.clone(),
            resolvers: self.resolvers.values().cloned().collect(),
            functions: self.functions.values().cloned().collect(),
        }
    }
}

impl ResourceGraph for InMemoryResourceGraph {
    fn contains_resolver(&self, id: &str) -> bool {
        self.resolvers.contains_key(id)
    }

    fn contains_function(&self, id: &str) -> bool {
        self.functions.contains_key(id)
    }

    fn add_data_source(&mut self, name: &str) -> Result<DataSourceHandle, GraphError> {
        if !self.data_sources.iter().any(|d| d == name) {
            self.data_sources.push(name.to_string());
        }
        Ok(DataSourceHandle::new(name))
    }

    fn create_resolver(&mut self, spec: ResolverSpec) -> Result<ResolverHandle, GraphError> {
        if self.resolvers.contains_key(&spec.id) {
            return Err(GraphError::DuplicateResource { id: spec.id });
        }
        let kind = match spec.kind {
            ResolverKind::Unit { data_source } => {
                self.require_data_source(data_source.name())?;
                RecordKind::Unit {
                    data_source: data_source.name().to_string(),
                }
            }
            ResolverKind::Pipeline => RecordKind::Pipeline {
                functions: Vec::new(),
            },
        };
        let record = ResolverRecord {
            id: spec.id.clone(),
            type_name: spec.field.type_name().to_string(),
            field_name: spec.field.field_name().to_string(),
            kind,
            code: spec.code,
        };
        self.resolvers.insert(spec.id.clone(), record);
        Ok(ResolverHandle::new(spec.id, spec.field))
    }

    fn create_function(&mut self, spec: FunctionSpec) -> Result<StageHandle, GraphError> {
        if self.functions.contains_key(&spec.id) {
            return Err(GraphError::DuplicateResource { id: spec.id });
        }
        self.require_data_source(spec.data_source.name())?;
        let record = FunctionRecord {
            id: spec.id.clone(),
            name: spec.name,
            data_source: spec.data_source.name().to_string(),
            code: spec.code,
        };
        self.functions.insert(spec.id.clone(), record);
        Ok(StageHandle::new(spec.id, spec.data_source.name()))
    }

    fn set_pipeline(
        &mut self,
        resolver: &ResolverHandle,
        functions: &[StageHandle],
    ) -> Result<(), GraphError> {
        if let Some(missing) = functions
            .iter()
            .find(|f| !self.functions.contains_key(f.id()))
        {
            return Err(GraphError::UnknownResource {
                id: missing.id().to_string(),
            });
        }
        let record = self
            .resolvers
            .get_mut(resolver.id())
            .ok_or_else(|| GraphError::UnknownResource {
                id: resolver.id().to_string(),
            })?;
        match &mut record.kind {
            RecordKind::Pipeline { functions: current } => {
                *current = functions.iter().map(|f| f.id().to_string()).collect();
                Ok(())
            }
            RecordKind::Unit { .. } => Err(GraphError::NotAPipeline {
                id: resolver.id().to_string(),
            }),
        }
    }
}

impl InMemoryResourceGraph {
    fn require_data_source(&self, name: &str) -> Result<(), GraphError> {
        if self.data_sources.iter().any(|d| d == name) {
            Ok(())
        } else {
            Err(GraphError::UnknownResource {
                id: name.to_string(),
            })
        }
    }
}
