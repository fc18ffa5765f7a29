//! Pipeline state entity
//!
//! One `PipelineState` exists per active pipeline field. It owns the
//! resolver handle created on activation and the merged, ordered stage list.

use crate::domain::entities::StageDescriptor;
use crate::domain::ports::{ResolverHandle, StageHandle};
use crate::domain::value_objects::FieldKey;

/// A stage that has been merged into a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedStage {
    pub descriptor: StageDescriptor,
    pub handle: StageHandle,
}

/// Whether the pipeline wrapper came from a `resolver.*` file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperSource {
    /// `Type.field/resolver.ts|js`
    Custom,
    /// Generated pass-through wrapper
    PassThrough,
}

/// Aggregated pipeline of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    field: FieldKey,
    resolver: ResolverHandle,
    wrapper: WrapperSource,
    stages: Vec<MergedStage>,
}

impl PipelineState {
    pub(crate) fn new(field: FieldKey, resolver: ResolverHandle, wrapper: WrapperSource) -> Self {
        Self {
            field,
            resolver,
            wrapper,
            stages: Vec::new(),
        }
    }

    pub fn field(&self) -> &FieldKey {
        &self.field
    }

    pub fn resolver(&self) -> &ResolverHandle {
        &self.resolver
    }

    pub fn wrapper(&self) -> WrapperSource {
        self.wrapper
    }

    /// Stages sorted ascending by order
    pub fn stages(&self) -> &[MergedStage] {
        &self.stages
    }

    /// Function handles in pipeline order
    pub fn stage_handles(&self) -> Vec<StageHandle> {
        self.stages.iter().map(|s| s.handle.clone()).collect()
    }

    /// Whether `entry` was already merged for `data_source`
    pub fn contains_entry(&self, data_source: &str, stage: &StageDescriptor) -> bool {
        self.stages.iter().any(|s| {
            s.descriptor.data_source == data_source && s.descriptor.entry_path == stage.entry_path
        })
    }

    /// Append stages, then re-sort by order.
    ///
    /// `sort_by_key` is stable, so equal orders keep insertion order.
    pub(crate) fn append(&mut self, stages: Vec<MergedStage>) {
        self.stages.extend(stages);
        self.stages.sort_by_key(|s| s.descriptor.order);
    }
}
