use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Trellis - convention-based resolver and pipeline assembler
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./trellis.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what the resolver root holds, per data source
    Scan {
        /// Resolver root (default: [discovery] root, then <base_dir>/resolvers)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Only show this data source
        #[arg(short = 'd', long = "data-source", value_name = "NAME")]
        data_source: Option<String>,
    },

    /// Register data sources in order and print the resulting resources
    Assemble {
        /// Resolver root (default: [discovery] root, then <base_dir>/resolvers)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Data sources to register, in registration order
        #[arg(
            short = 'd',
            long = "data-source",
            value_name = "NAME",
            required = true,
            num_args = 1..
        )]
        data_sources: Vec<String>,

        /// Do not embed inline source maps
        #[arg(long)]
        exclude_source_map: bool,

        /// Artifact directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Create one unit resolver per flat Type.field.ts|js file
    LoadAll {
        /// Data source the resolvers are bound to
        #[arg(short = 'd', long = "data-source", value_name = "NAME")]
        data_source: String,

        /// Directory to load from (default: <base_dir>/resolvers)
        #[arg(long, value_name = "DIR")]
        entry_dir: Option<PathBuf>,

        /// Do not embed inline source maps
        #[arg(long)]
        exclude_source_map: bool,

        /// Artifact directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}
