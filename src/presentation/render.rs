//! Text rendering of classifications and manifests

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::entities::Snapshot;
use crate::domain::services::Classification;
use crate::infrastructure::graph::{Manifest, RecordKind};

/// Path of `path` relative to `root`, or `path` itself
fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Render what a snapshot holds for one data source
pub fn render_classification(
    snapshot: &Snapshot,
    data_source: &str,
    classification: &Classification,
) -> String {
    let root = snapshot.root();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} entries), data source '{}'",
        root.display(),
        snapshot.len(),
        data_source
    );

    if classification.is_empty() {
        out.push_str("  nothing to assemble\n");
        return out;
    }

    if !classification.units.is_empty() {
        out.push_str("unit resolvers:\n");
        for unit in &classification.units {
            let _ = writeln!(
                out,
                "  {:<24} {}",
                unit.field.to_string(),
                relative(&unit.entry_path, root).display()
            );
        }
    }

    if !classification.pipelines.is_empty() {
        out.push_str("pipelines:\n");
        for pipeline in &classification.pipelines {
            let wrapper = match &pipeline.wrapper {
                Some(path) => relative(path, root).display().to_string(),
                None => "pass-through".to_string(),
            };
            let _ = writeln!(out, "  {:<24} wrapper: {}", pipeline.field.to_string(), wrapper);
            for stage in &pipeline.stages {
                let _ = writeln!(out, "    {:>3}. {}", stage.order, stage.stage_name);
            }
        }
    }

    out
}

/// Render a manifest as a text summary (timestamp omitted)
pub fn render_manifest(manifest: &Manifest) -> String {
    let mut out = String::new();
    let sources = if manifest.data_sources.is_empty() {
        "(none)".to_string()
    } else {
        manifest.data_sources.join(", ")
    };
    let _ = writeln!(out, "data sources: {}", sources);

    if manifest.resolvers.is_empty() {
        out.push_str("no resolvers\n");
        return out;
    }

    out.push_str("resolvers:\n");
    for resolver in &manifest.resolvers {
        let field = format!("{}.{}", resolver.type_name, resolver.field_name);
        match &resolver.kind {
            RecordKind::Unit { data_source } => {
                let _ = writeln!(
                    out,
                    "  {:<24} {:<24} unit [{}] {}",
                    resolver.id, field, data_source, resolver.code
                );
            }
            RecordKind::Pipeline { functions } => {
                let _ = writeln!(
                    out,
                    "  {:<24} {:<24} pipeline {}",
                    resolver.id, field, resolver.code
                );
                for (position, id) in functions.iter().enumerate() {
                    let source = manifest
                        .functions
                        .iter()
                        .find(|f| &f.id == id)
                        .map(|f| f.data_source.as_str())
                        .unwrap_or("?");
                    let _ = writeln!(out, "    {}. {} [{}]", position + 1, id, source);
                }
            }
        }
    }

    let _ = writeln!(out, "functions: {}", manifest.functions.len());
    out
}
