use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;

use trellis::domain::services::{classify, referenced_data_sources, Classification};
use trellis::infrastructure::DirectoryScanner;
use trellis::presentation::{render_classification, OutputFormat};
use trellis::Config;

pub fn cmd_scan(
    config: &Config,
    root: Option<PathBuf>,
    data_source: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut options = config.api_options();
    if root.is_some() {
        options.root = root;
    }
    let root = options.discovery_root()?;
    let snapshot = DirectoryScanner::new().scan(&root)?;

    let names: Vec<String> = match data_source {
        Some(name) => vec![name],
        None => referenced_data_sources(&snapshot).into_iter().collect(),
    };
    let classified: Vec<(String, Classification)> = names
        .into_iter()
        .map(|name| {
            let classification = classify(&snapshot, &name);
            (name, classification)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let data_sources: Vec<_> = classified
                .iter()
                .map(|(name, c)| classification_json(name, c))
                .collect();
            let output = json!({
                "root": snapshot.root(),
                "entries": snapshot.len(),
                "data_sources": data_sources,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if classified.is_empty() {
                println!(
                    "{} ({} entries): no data sources referenced",
                    snapshot.root().display(),
                    snapshot.len()
                );
            }
            for (name, classification) in &classified {
                print!("{}", render_classification(&snapshot, name, classification));
            }
        }
    }
    Ok(())
}

fn classification_json(name: &str, classification: &Classification) -> serde_json::Value {
    let units: Vec<_> = classification
        .units
        .iter()
        .map(|u| json!({ "field": u.field.to_string(), "entry": u.entry_path }))
        .collect();
    let pipelines: Vec<_> = classification
        .pipelines
        .iter()
        .map(|p| {
            let stages: Vec<_> = p
                .stages
                .iter()
                .map(|s| json!({ "order": s.order, "name": s.stage_name, "entry": s.entry_path }))
                .collect();
            json!({ "field": p.field.to_string(), "wrapper": p.wrapper, "stages": stages })
        })
        .collect();
    json!({ "name": name, "units": units, "pipelines": pipelines })
}
