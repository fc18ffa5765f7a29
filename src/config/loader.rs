//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{TrellisError, TrellisResult};

use super::types::{Config, Verbosity};

/// Project config file, relative to the project root
pub const PROJECT_CONFIG_FILE: &str = "trellis.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
///
/// Relative paths are resolved against the file's directory.
pub fn load_with_warnings(path: &Path) -> TrellisResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| TrellisError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    let config = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => config.resolve_relative_to(dir),
        _ => config,
    };

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
pub fn load_or_default(project_root: Option<&Path>) -> TrellisResult<(Config, Vec<ConfigWarning>)> {
    let candidates = project_root
        .map(|root| root.join(PROJECT_CONFIG_FILE))
        .into_iter()
        .chain(user_config_dir().map(|dir| dir.join("trellis/config.toml")));

    for candidate in candidates {
        if candidate.is_file() {
            debug!(file = %candidate.display(), "Loading config");
            let (config, warnings) = load_with_warnings(&candidate)?;
            return Ok((with_env_overrides(config, env_var), warnings));
        }
    }

    Ok((with_env_overrides(Config::default(), env_var), Vec::new()))
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Apply environment variable overrides (TRELLIS_* prefix)
pub fn with_env_overrides<F>(mut config: Config, var: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // TRELLIS_ROOT
    if let Some(root) = var("TRELLIS_ROOT").filter(|v| !v.is_empty()) {
        config.discovery.root = Some(PathBuf::from(root));
    }

    // TRELLIS_BASE_DIR
    if let Some(base) = var("TRELLIS_BASE_DIR").filter(|v| !v.is_empty()) {
        config.discovery.base_dir = Some(PathBuf::from(base));
    }

    // TRELLIS_EXCLUDE_SOURCE_MAP
    if let Some(val) = var("TRELLIS_EXCLUDE_SOURCE_MAP") {
        config.bundling.exclude_source_map = val.to_lowercase() != "false" && val != "0";
    }

    // TRELLIS_VERBOSITY
    if let Some(verbosity) = var("TRELLIS_VERBOSITY") {
        config.output.verbosity = Verbosity::parse(&verbosity).unwrap_or_default();
    }

    config
}

/// User config directory, honoring `XDG_CONFIG_HOME`
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

pub(crate) fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "discovery",
        "root",
        "base_dir",
        "default_subdir",
        "bundling",
        "exclude_source_map",
        "out_dir",
        "command",
        "output",
        "verbosity",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
