use std::path::PathBuf;

use anyhow::{Context, Result};

use trellis::presentation::OutputFormat;
use trellis::{Config, GraphqlApi, InMemoryResourceGraph};

use super::{apply_bundling_flags, print_manifest};

pub fn cmd_assemble(
    config: &Config,
    root: Option<PathBuf>,
    data_sources: &[String],
    exclude_source_map: bool,
    out_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = config.clone();
    apply_bundling_flags(&mut config, exclude_source_map, out_dir);

    let mut options = config.api_options();
    if root.is_some() {
        options.root = root;
    }

    let mut api = GraphqlApi::new(options, config.bundler(), InMemoryResourceGraph::new())?;
    for name in data_sources {
        api.register_data_source(name)
            .with_context(|| format!("failed to register data source '{}'", name))?;
    }

    print_manifest(api.graph(), format)
}
