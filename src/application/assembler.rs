//! Resolver assembler
//!
//! Turns classifier output and aggregator state into resources. A
//! registration runs in two phases:
//!
//! 1. `plan`: validate every descriptor against the current state, claim
//!    every resource id the registration will create, and bundle every
//!    entry file. Nothing is mutated.
//! 2. `apply`: create resources and update aggregator and registry.
//!
//! A failed plan leaves everything exactly as it was.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info};

use crate::domain::entities::{
    MergedStage, PipelineDirectory, StageDescriptor, UnitResolverDescriptor, WrapperSource,
};
use crate::domain::ports::{
    Bundler, BundlingOptions, CodeRef, DataSourceHandle, FunctionSpec, ResolverHandle,
    ResolverKind, ResolverSpec, ResourceGraph,
};
use crate::domain::services::{Classification, PipelineAggregator, UnitBinding, UnitRegistry};
use crate::domain::value_objects::resource_id::{function_id, resolver_id};
use crate::domain::value_objects::FieldKey;
use crate::error::{TrellisError, TrellisResult};

/// Code of the generated wrapper used when a pipeline has no `resolver.*` file
pub const PASS_THROUGH_WRAPPER: &str = "\
export function request(ctx) {
  return {};
}

export function response(ctx) {
  return ctx.prev.result;
}
";

pub fn pass_through_code() -> CodeRef {
    CodeRef::Inline {
        code: PASS_THROUGH_WRAPPER.to_string(),
    }
}

/// Resource ids a pending operation will create.
///
/// Each claim is checked against earlier claims and against the graph, so an
/// id collision surfaces before anything is created.
pub(crate) struct IdClaims<'g> {
    graph: &'g dyn ResourceGraph,
    resolvers: BTreeMap<String, String>,
    functions: BTreeMap<String, String>,
}

impl<'g> IdClaims<'g> {
    pub(crate) fn new(graph: &'g dyn ResourceGraph) -> Self {
        Self {
            graph,
            resolvers: BTreeMap::new(),
            functions: BTreeMap::new(),
        }
    }

    /// Claim the resolver id of `field`
    pub(crate) fn resolver(&mut self, field: &FieldKey) -> TrellisResult<()> {
        let id = resolver_id(field);
        let taken = self.graph.contains_resolver(&id);
        claim(&mut self.resolvers, taken, "resolver", id, field.to_string())
    }

    /// Claim a pipeline function id on behalf of `owner`
    pub(crate) fn function(&mut self, id: String, owner: String) -> TrellisResult<()> {
        let taken = self.graph.contains_function(&id);
        claim(&mut self.functions, taken, "function", id, owner)
    }
}

fn claim(
    claimed: &mut BTreeMap<String, String>,
    in_graph: bool,
    kind: &'static str,
    id: String,
    owner: String,
) -> TrellisResult<()> {
    let existing = match claimed.get(&id) {
        Some(first) => Some(first.clone()),
        None if in_graph => Some("an existing resource".to_string()),
        None => None,
    };
    if let Some(existing) = existing {
        return Err(TrellisError::ResourceIdCollision {
            kind,
            id,
            existing,
            incoming: owner,
        });
    }
    claimed.insert(id, owner);
    Ok(())
}

/// A unit resolver ready to be created
#[derive(Debug, Clone)]
pub struct PlannedUnit {
    pub descriptor: UnitResolverDescriptor,
    pub code: CodeRef,
}

/// A pipeline contribution ready to be applied
#[derive(Debug, Clone)]
pub struct PlannedPipeline {
    pub field: FieldKey,
    /// Present only when the field is not active yet
    pub activation: Option<(CodeRef, WrapperSource)>,
    pub stages: Vec<(StageDescriptor, CodeRef)>,
}

impl PlannedPipeline {
    fn is_noop(&self) -> bool {
        self.activation.is_none() && self.stages.is_empty()
    }
}

/// Everything one data-source registration will change
#[derive(Debug, Clone, Default)]
pub struct RegistrationPlan {
    pub units: Vec<PlannedUnit>,
    pub pipelines: Vec<PlannedPipeline>,
}

impl RegistrationPlan {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.pipelines.iter().all(PlannedPipeline::is_noop)
    }
}

/// What a registration produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedRegistration {
    pub units: Vec<ResolverHandle>,
    /// Pipelines activated by this registration
    pub activated: Vec<ResolverHandle>,
    /// Stages merged by this registration
    pub merged_stages: usize,
}

/// Bridges classification and aggregation to the Bundler and ResourceGraph
pub struct ResolverAssembler {
    bundler: Box<dyn Bundler>,
    defaults: BundlingOptions,
}

impl ResolverAssembler {
    pub fn new(bundler: Box<dyn Bundler>, defaults: BundlingOptions) -> Self {
        Self { bundler, defaults }
    }

    pub fn defaults(&self) -> &BundlingOptions {
        &self.defaults
    }

    /// Bundle `entry`, falling back to the default options
    pub fn bundle(
        &self,
        entry: &Path,
        options: Option<&BundlingOptions>,
    ) -> TrellisResult<CodeRef> {
        let options = options.unwrap_or(&self.defaults);
        let code = self.bundler.bundle(entry, options)?;
        debug!(entry = %entry.display(), code = %code, "Bundled entry");
        Ok(code)
    }

    /// Validate and bundle one data source's contribution.
    ///
    /// Every check, including resource id claims, runs before the first
    /// entry is bundled.
    pub fn plan(
        &self,
        data_source: &str,
        classification: &Classification,
        aggregator: &PipelineAggregator,
        units: &UnitRegistry,
        graph: &dyn ResourceGraph,
    ) -> TrellisResult<RegistrationPlan> {
        let pipeline_fields: BTreeSet<&FieldKey> = classification
            .pipelines
            .iter()
            .map(|p| &p.field)
            .collect();

        for (field, _) in units.iter() {
            if pipeline_fields.contains(field) {
                return Err(TrellisError::ResolverKindConflict {
                    field: field.clone(),
                });
            }
        }

        let mut claimed: BTreeMap<&FieldKey, &UnitResolverDescriptor> = BTreeMap::new();
        let mut ids = IdClaims::new(graph);

        let mut pending_units = Vec::new();
        for unit in &classification.units {
            if pipeline_fields.contains(&unit.field) || aggregator.is_active(&unit.field) {
                return Err(TrellisError::ResolverKindConflict {
                    field: unit.field.clone(),
                });
            }
            if let Some(first) = claimed.insert(&unit.field, unit) {
                return Err(TrellisError::DuplicateUnitResolver {
                    field: unit.field.clone(),
                    existing_source: first.data_source.clone(),
                    existing: first.entry_path.clone(),
                    incoming_source: unit.data_source.clone(),
                    incoming: unit.entry_path.clone(),
                });
            }
            if !units.admit(&unit.field, data_source, &unit.entry_path)? {
                debug!(field = %unit.field, data_source, "Unit resolver already created");
                continue;
            }
            ids.resolver(&unit.field)?;
            pending_units.push(unit);
        }

        let mut pending_pipelines = Vec::with_capacity(classification.pipelines.len());
        for pipeline in &classification.pipelines {
            let fresh = aggregator.admit(&pipeline.field, data_source, &pipeline.stages)?;
            let active = aggregator.is_active(&pipeline.field);
            if !active {
                ids.resolver(&pipeline.field)?;
            }
            for stage in &fresh {
                ids.function(
                    function_id(&stage.field, &stage.data_source, &stage.stage_name),
                    format!("stage '{}' of {}", stage.stage_name, stage.field),
                )?;
            }
            pending_pipelines.push((pipeline, active, fresh));
        }

        let mut plan = RegistrationPlan::default();
        for unit in pending_units {
            plan.units.push(PlannedUnit {
                descriptor: unit.clone(),
                code: self.bundle(&unit.entry_path, None)?,
            });
        }
        for (pipeline, active, fresh) in pending_pipelines {
            plan.pipelines
                .push(self.bundle_pipeline(pipeline, active, fresh)?);
        }

        Ok(plan)
    }

    fn bundle_pipeline(
        &self,
        pipeline: &PipelineDirectory,
        active: bool,
        fresh: Vec<StageDescriptor>,
    ) -> TrellisResult<PlannedPipeline> {
        let activation = if active {
            None
        } else {
            Some(match &pipeline.wrapper {
                Some(wrapper) => (self.bundle(wrapper, None)?, WrapperSource::Custom),
                None => (pass_through_code(), WrapperSource::PassThrough),
            })
        };

        let stages = fresh
            .into_iter()
            .map(|stage| {
                let code = self.bundle(&stage.entry_path, None)?;
                Ok((stage, code))
            })
            .collect::<TrellisResult<Vec<_>>>()?;

        Ok(PlannedPipeline {
            field: pipeline.field.clone(),
            activation,
            stages,
        })
    }

    /// Create resources for a validated plan.
    ///
    /// Every id was claimed against the graph during planning. A graph that
    /// still rejects an operation midway leaves the resources created before
    /// it in place.
    pub fn apply(
        &self,
        plan: RegistrationPlan,
        data_source: &DataSourceHandle,
        aggregator: &mut PipelineAggregator,
        units: &mut UnitRegistry,
        graph: &mut dyn ResourceGraph,
    ) -> TrellisResult<AppliedRegistration> {
        let mut applied = AppliedRegistration::default();

        for unit in plan.units {
            let handle = create_unit(graph, data_source, &unit.descriptor.field, unit.code)?;
            info!(
                field = %unit.descriptor.field,
                data_source = data_source.name(),
                resolver = handle.id(),
                "Created unit resolver"
            );
            units.insert(
                unit.descriptor.field,
                UnitBinding {
                    data_source: data_source.name().to_string(),
                    entry_path: unit.descriptor.entry_path,
                    handle: handle.clone(),
                },
            );
            applied.units.push(handle);
        }

        for pipeline in plan.pipelines {
            if let Some((code, wrapper)) = pipeline.activation {
                let handle = graph.create_resolver(ResolverSpec {
                    id: resolver_id(&pipeline.field),
                    field: pipeline.field.clone(),
                    kind: ResolverKind::Pipeline,
                    code,
                })?;
                aggregator.activate(pipeline.field.clone(), handle.clone(), wrapper);
                applied.activated.push(handle);
            }

            if pipeline.stages.is_empty() {
                continue;
            }

            let mut merged = Vec::with_capacity(pipeline.stages.len());
            for (descriptor, code) in pipeline.stages {
                let handle = graph.create_function(FunctionSpec {
                    id: function_id(
                        &descriptor.field,
                        &descriptor.data_source,
                        &descriptor.stage_name,
                    ),
                    name: descriptor.stage_name.clone(),
                    data_source: data_source.clone(),
                    code,
                })?;
                merged.push(MergedStage { descriptor, handle });
            }
            applied.merged_stages += merged.len();

            if let Some(state) = aggregator.merge(&pipeline.field, merged) {
                graph.set_pipeline(state.resolver(), &state.stage_handles())?;
                info!(
                    field = %pipeline.field,
                    data_source = data_source.name(),
                    stages = state.stages().len(),
                    "Updated pipeline"
                );
            }
        }

        Ok(applied)
    }
}

/// Create a unit resolver resource for `field`
pub(crate) fn create_unit(
    graph: &mut dyn ResourceGraph,
    data_source: &DataSourceHandle,
    field: &FieldKey,
    code: CodeRef,
) -> TrellisResult<ResolverHandle> {
    Ok(graph.create_resolver(ResolverSpec {
        id: resolver_id(field),
        field: field.clone(),
        kind: ResolverKind::Unit {
            data_source: data_source.clone(),
        },
        code,
    })?)
}
