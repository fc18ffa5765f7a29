//! Domain Entities
//!
//! Core domain objects: the scan snapshot, classified descriptors and the
//! per-field pipeline state.

mod descriptor;
mod pipeline;
mod snapshot;

pub use descriptor::{PipelineDirectory, StageDescriptor, UnitResolverDescriptor};
pub use pipeline::{MergedStage, PipelineState, WrapperSource};
pub use snapshot::{ScanEntry, Snapshot};
