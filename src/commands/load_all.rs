use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use trellis::presentation::OutputFormat;
use trellis::{Config, GraphqlApi, InMemoryResourceGraph, LoadAllOptions};

use super::{apply_bundling_flags, print_manifest};

pub fn cmd_load_all(
    config: &Config,
    data_source: &str,
    entry_dir: Option<PathBuf>,
    exclude_source_map: bool,
    out_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = config.clone();
    apply_bundling_flags(&mut config, exclude_source_map, out_dir);

    let mut options = config.api_options();
    if options.root.is_none() {
        options.root = entry_dir.clone();
    }

    let mut api = GraphqlApi::new(options, config.bundler(), InMemoryResourceGraph::new())?;
    let handle = api
        .register_data_source(data_source)
        .with_context(|| format!("failed to register data source '{}'", data_source))?;

    let load = LoadAllOptions {
        entry_dir,
        bundling: None,
    };
    let created = api.load_all_resolvers(&handle, &load)?;
    info!(data_source, created = created.len(), "load-all finished");

    print_manifest(api.graph(), format)
}
