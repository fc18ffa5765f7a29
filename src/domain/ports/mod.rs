//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod bundler;
pub mod file_system;
pub mod resource_graph;

pub use bundler::{BundleError, Bundler, BundlingOptions, CapturedOutput, CodeRef};
pub use file_system::{FileSystem, FsError, FsResult};
pub use resource_graph::{
    DataSourceHandle, FunctionSpec, GraphError, ResolverHandle, ResolverKind, ResolverSpec,
    ResourceGraph, StageHandle,
};
