//! ResourceGraph adapters

mod memory;

pub use memory::{FunctionRecord, InMemoryResourceGraph, Manifest, RecordKind, ResolverRecord};
