//! Entry classifier
//!
//! Applies the path grammar to a snapshot for one target data source.
//!
//! Layout rules:
//! - A pipeline directory is a `Type.field` directory with no `Type.field`
//!   ancestor. Everything below it belongs to that pipeline: its direct
//!   children are read as stages and wrapper, deeper entries are ignored.
//! - Unit resolver files may sit at any depth outside pipeline directories.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, warn};

use super::grammar;
use crate::domain::entities::{
    PipelineDirectory, ScanEntry, Snapshot, StageDescriptor, UnitResolverDescriptor,
};
use crate::domain::value_objects::{FieldKey, SourceExtension};

/// Everything in a snapshot relevant to one data source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Unit resolvers tagged with the target data source
    pub units: Vec<UnitResolverDescriptor>,
    /// Every pipeline directory, with stages filtered to the target
    pub pipelines: Vec<PipelineDirectory>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.pipelines.is_empty()
    }

    pub fn stage_count(&self) -> usize {
        self.pipelines.iter().map(|p| p.stages.len()).sum()
    }
}

/// Classify `snapshot` for `data_source`
pub fn classify(snapshot: &Snapshot, data_source: &str) -> Classification {
    let mut classification = Classification::default();

    for entry in snapshot.entries() {
        if inside_pipeline(entry.relative_path()) {
            continue;
        }

        if entry.is_directory() {
            if let Some(field) = grammar::parse_pipeline_dir(entry.name()) {
                classification
                    .pipelines
                    .push(classify_pipeline(snapshot, entry, field, data_source));
            }
            continue;
        }

        if let Some(unit) = grammar::parse_unit_resolver(entry.name()) {
            if unit.data_source == data_source {
                classification.units.push(UnitResolverDescriptor {
                    field: unit.field,
                    data_source: unit.data_source,
                    entry_path: snapshot.absolute(entry),
                });
            }
        }
    }

    debug!(
        data_source,
        units = classification.units.len(),
        pipelines = classification.pipelines.len(),
        stages = classification.stage_count(),
        "Classified snapshot"
    );

    classification
}

/// Data source names tagged anywhere in the snapshot, sorted
pub fn referenced_data_sources(snapshot: &Snapshot) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for entry in snapshot.entries() {
        if entry.is_directory() {
            continue;
        }
        let relative = entry.relative_path();
        let tagged = if inside_pipeline(relative) {
            let direct_child = entry
                .parent()
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(grammar::parse_pipeline_dir)
                .is_some()
                && !inside_pipeline(entry.parent());
            if direct_child {
                grammar::parse_stage(entry.name()).map(|s| s.data_source)
            } else {
                None
            }
        } else {
            grammar::parse_unit_resolver(entry.name()).map(|u| u.data_source)
        };
        names.extend(tagged);
    }
    names
}

fn classify_pipeline(
    snapshot: &Snapshot,
    dir: &ScanEntry,
    field: FieldKey,
    data_source: &str,
) -> PipelineDirectory {
    let mut wrappers: Vec<(SourceExtension, &ScanEntry)> = Vec::new();
    let mut stages = Vec::new();

    for child in snapshot.children_of(dir.relative_path()) {
        if child.is_directory() {
            continue;
        }
        if let Some(stage) = grammar::parse_stage(child.name()) {
            if stage.data_source == data_source {
                stages.push(StageDescriptor {
                    field: field.clone(),
                    order: stage.order,
                    stage_name: stage.stage_name,
                    data_source: stage.data_source,
                    entry_path: snapshot.absolute(child),
                });
            }
        } else if let Some(ext) = grammar::parse_wrapper(child.name()) {
            wrappers.push((ext, child));
        }
    }

    let wrapper = pick_wrapper(&field, wrappers).map(|entry| snapshot.absolute(entry));

    PipelineDirectory {
        field,
        path: snapshot.absolute(dir),
        wrapper,
        stages,
    }
}

/// At most one wrapper per pipeline; `.ts` wins over `.js`.
fn pick_wrapper<'a>(
    field: &FieldKey,
    mut wrappers: Vec<(SourceExtension, &'a ScanEntry)>,
) -> Option<&'a ScanEntry> {
    if wrappers.len() > 1 {
        warn!(
            field = %field,
            count = wrappers.len(),
            "Multiple pipeline wrapper files, using the .ts one"
        );
    }
    wrappers.sort_by_key(|(ext, _)| ext.rank());
    wrappers.into_iter().next().map(|(_, entry)| entry)
}

fn inside_pipeline(relative: &Path) -> bool {
    relative
        .ancestors()
        .skip(1)
        .filter_map(|a| a.file_name().and_then(|n| n.to_str()))
        .any(|name| grammar::parse_pipeline_dir(name).is_some())
}
