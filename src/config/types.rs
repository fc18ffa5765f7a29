//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::{ApiOptions, DEFAULT_SUBDIR};
use crate::domain::ports::{Bundler, BundlingOptions};
use crate::error::TrellisResult;
use crate::infrastructure::bundler;

use super::loader::{self, ConfigWarning};

/// Where resolvers are discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Convention root scanned once at construction
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Base directory for the default resolver folder
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    #[serde(default = "default_subdir")]
    pub default_subdir: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: None,
            base_dir: None,
            default_subdir: default_subdir(),
        }
    }
}

fn default_subdir() -> String {
    DEFAULT_SUBDIR.to_string()
}

/// Bundler selection and options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlingConfig {
    #[serde(default)]
    pub exclude_source_map: bool,

    /// Content-addressed artifact directory
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// External bundler argv; empty selects the staging bundler
    #[serde(default)]
    pub command: Vec<String>,
}

impl Default for BundlingConfig {
    fn default() -> Self {
        Self {
            exclude_source_map: false,
            out_dir: default_out_dir(),
            command: Vec::new(),
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".trellis/assets")
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Parse a level name, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    /// Default `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub bundling: BundlingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> TrellisResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> TrellisResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults, then apply
    /// `TRELLIS_*` environment overrides
    pub fn load_or_default(project_root: Option<&Path>) -> TrellisResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (TRELLIS_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Make relative paths absolute against `dir`
    pub fn resolve_relative_to(mut self, dir: &Path) -> Self {
        let absolutize = |p: PathBuf| if p.is_relative() { dir.join(p) } else { p };
        self.discovery.root = self.discovery.root.map(absolutize);
        self.discovery.base_dir = self.discovery.base_dir.map(absolutize);
        self.bundling.out_dir = absolutize(self.bundling.out_dir);
        self
    }

    pub fn bundling_options(&self) -> BundlingOptions {
        BundlingOptions {
            exclude_source_map: self.bundling.exclude_source_map,
        }
    }

    /// Construction options for the API root
    pub fn api_options(&self) -> ApiOptions {
        let mut options = ApiOptions::new().with_bundling(self.bundling_options());
        options.root = self.discovery.root.clone();
        options.base_dir = self.discovery.base_dir.clone();
        options.default_subdir = self.discovery.default_subdir.clone();
        options
    }

    /// Bundler selected by `[bundling] command`
    pub fn bundler(&self) -> Box<dyn Bundler> {
        bundler::select(self.bundling.out_dir.clone(), &self.bundling.command)
    }
}
