//! Trellis CLI - convention-based resolver and pipeline assembler
//!
//! Usage: trellis <COMMAND>
//!
//! Commands:
//!   scan      Show what the resolver root holds, per data source
//!   assemble  Register data sources in order and print the resources
//!   load-all  Create unit resolvers from flat Type.field files

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use trellis::presentation::OutputFormat;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, warnings) = commands::load_config(cli.config.as_deref())?;
    logging::init(cli.verbose, config.output.verbosity);
    for warning in &warnings {
        warn!("{}", warning);
    }

    let format = OutputFormat::from_json_flag(cli.json);
    match cli.command {
        Commands::Scan { root, data_source } => {
            commands::cmd_scan(&config, root, data_source, format)
        }
        Commands::Assemble {
            root,
            data_sources,
            exclude_source_map,
            out_dir,
        } => commands::cmd_assemble(
            &config,
            root,
            &data_sources,
            exclude_source_map,
            out_dir,
            format,
        ),
        Commands::LoadAll {
            data_source,
            entry_dir,
            exclude_source_map,
            out_dir,
        } => commands::cmd_load_all(
            &config,
            &data_source,
            entry_dir,
            exclude_source_map,
            out_dir,
            format,
        ),
    }
}
