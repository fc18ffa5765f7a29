//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports: local file system access,
//! directory scanning, bundlers and the in-memory resource graph.

pub mod bundler;
pub mod fs;
pub mod graph;

pub use bundler::{CommandBundler, StagingBundler};
pub use fs::{DirectoryScanner, LocalFs};
pub use graph::InMemoryResourceGraph;
