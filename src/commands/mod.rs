//! Subcommand implementations

mod assemble;
mod load_all;
mod scan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use trellis::config::{with_env_overrides, ConfigWarning};
use trellis::presentation::{render_manifest, OutputFormat};
use trellis::{Config, InMemoryResourceGraph};

pub use assemble::cmd_assemble;
pub use load_all::cmd_load_all;
pub use scan::cmd_scan;

/// Load `--config FILE` or the default hierarchy, with env overrides applied.
///
/// Without a configured base directory the working directory is used, so
/// `./resolvers` is the default root.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>)> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let (mut config, warnings) = match explicit {
        Some(path) => {
            let (config, warnings) = Config::load_with_warnings(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            (with_env_overrides(config, |key| std::env::var(key).ok()), warnings)
        }
        None => Config::load_or_default(Some(&cwd))?,
    };

    if config.discovery.base_dir.is_none() {
        config.discovery.base_dir = Some(cwd.clone());
    }
    if config.bundling.out_dir.is_relative() {
        config.bundling.out_dir = cwd.join(&config.bundling.out_dir);
    }
    Ok((config, warnings))
}

/// Bundling flags shared by `assemble` and `load-all`
fn apply_bundling_flags(config: &mut Config, exclude_source_map: bool, out_dir: Option<PathBuf>) {
    if exclude_source_map {
        config.bundling.exclude_source_map = true;
    }
    if let Some(dir) = out_dir {
        config.bundling.out_dir = dir;
    }
}

fn print_manifest(graph: &InMemoryResourceGraph, format: OutputFormat) -> Result<()> {
    let manifest = graph.manifest();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&manifest)?),
        OutputFormat::Text => print!("{}", render_manifest(&manifest)),
    }
    Ok(())
}
