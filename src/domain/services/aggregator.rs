//! Pipeline aggregator
//!
//! Per-field state machine merging stage contributions that arrive from
//! separate data-source registrations.
//!
//! ```text
//! Absent --activate--> Active --merge--> Active
//! ```
//!
//! `Active` is terminal. The resolver handle is set once on activation and
//! never replaced. After every merge the stage list is sorted ascending by
//! order; ties keep insertion order, so equal orders from different
//! registrations depend on registration order.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::domain::entities::{MergedStage, PipelineState, StageDescriptor, WrapperSource};
use crate::domain::ports::ResolverHandle;
use crate::domain::value_objects::FieldKey;
use crate::error::{TrellisError, TrellisResult};

/// Pipeline state keyed by field
#[derive(Debug, Default)]
pub struct PipelineAggregator {
    pipelines: BTreeMap<FieldKey, PipelineState>,
}

impl PipelineAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &FieldKey) -> Option<&PipelineState> {
        self.pipelines.get(field)
    }

    pub fn is_active(&self, field: &FieldKey) -> bool {
        self.pipelines.contains_key(field)
    }

    /// Active pipelines ordered by field key
    pub fn pipelines(&self) -> impl Iterator<Item = &PipelineState> {
        self.pipelines.values()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Validate a contribution and return the stages not yet merged.
    ///
    /// Stages whose entry file was already merged for the same data source
    /// are dropped, so re-registering a data source is a no-op. The remaining
    /// stages must keep stage names and order numbers unique per data source,
    /// counting stages merged by earlier registrations.
    pub fn admit(
        &self,
        field: &FieldKey,
        data_source: &str,
        stages: &[StageDescriptor],
    ) -> TrellisResult<Vec<StageDescriptor>> {
        let existing = self.pipelines.get(field);
        let fresh: Vec<StageDescriptor> = stages
            .iter()
            .filter(|s| !existing.is_some_and(|p| p.contains_entry(data_source, s)))
            .cloned()
            .collect();

        let merged = existing
            .map(|p| p.stages())
            .unwrap_or_default()
            .iter()
            .map(|s| &s.descriptor)
            .filter(|d| d.data_source == data_source);
        let all: Vec<&StageDescriptor> = merged.chain(fresh.iter()).collect();

        let mut names: HashSet<&str> = HashSet::new();
        for stage in &all {
            if !names.insert(stage.stage_name.as_str()) {
                return Err(TrellisError::DuplicateStageName {
                    field: field.clone(),
                    data_source: data_source.to_string(),
                    stage: stage.stage_name.clone(),
                });
            }
        }

        let mut orders: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for stage in &all {
            orders
                .entry(stage.order)
                .or_default()
                .push(stage.stage_name.clone());
        }
        if let Some((order, stages)) = orders.into_iter().find(|(_, names)| names.len() > 1) {
            return Err(TrellisError::DuplicateStageOrder {
                field: field.clone(),
                data_source: data_source.to_string(),
                order,
                stages,
            });
        }

        Ok(fresh)
    }

    /// `Absent -> Active`.
    ///
    /// Returns `false` and leaves the existing state untouched when the field
    /// is already active.
    pub fn activate(
        &mut self,
        field: FieldKey,
        resolver: ResolverHandle,
        wrapper: WrapperSource,
    ) -> bool {
        if self.pipelines.contains_key(&field) {
            return false;
        }
        debug!(field = %field, resolver = resolver.id(), ?wrapper, "Pipeline activated");
        self.pipelines
            .insert(field.clone(), PipelineState::new(field, resolver, wrapper));
        true
    }

    /// `Active -> Active`: append stages and re-sort.
    ///
    /// Returns `None` if the field was never activated.
    pub fn merge(&mut self, field: &FieldKey, stages: Vec<MergedStage>) -> Option<&PipelineState> {
        let state = self.pipelines.get_mut(field)?;
        let added = stages.len();
        state.append(stages);
        debug!(
            field = %field,
            added,
            total = state.stages().len(),
            "Merged pipeline stages"
        );
        Some(&*state)
    }
}
