//! Bundler port - turns a handler entry file into deployable code
//!
//! Packaging and transpilation live behind this trait; the assembler only
//! ever sees the opaque `CodeRef` that comes back.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::ContentHash;

/// Recognized bundling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BundlingOptions {
    /// Omit inline source maps from the produced artifact
    #[serde(default)]
    pub exclude_source_map: bool,
}

impl BundlingOptions {
    /// Stable serialized form, part of the content address
    pub fn fingerprint(&self) -> String {
        format!("exclude_source_map={}", self.exclude_source_map)
    }
}

/// Opaque reference to deployable code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeRef {
    /// Content-addressed artifact produced by a bundler
    Asset { hash: ContentHash, path: PathBuf },
    /// Code generated in-process (never bundled)
    Inline { code: String },
}

impl fmt::Display for CodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeRef::Asset { hash, .. } => write!(f, "asset {}", hash.short()),
            CodeRef::Inline { .. } => f.write_str("inline"),
        }
    }
}

/// Process output captured from an external bundler
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapturedOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for CapturedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => writeln!(f, "exit status: {}", code)?,
            None => writeln!(f, "terminated by signal")?,
        }
        if !self.stdout.trim().is_empty() {
            writeln!(f, "stdout:\n{}", self.stdout.trim_end())?;
        }
        if !self.stderr.trim().is_empty() {
            writeln!(f, "stderr:\n{}", self.stderr.trim_end())?;
        }
        Ok(())
    }
}

/// Bundling failure, carried verbatim to the caller
#[derive(Debug, Error)]
#[error("failed to bundle {}: {message}{}", .entry.display(), render_output(.output))]
pub struct BundleError {
    pub entry: PathBuf,
    pub message: String,
    pub output: Option<CapturedOutput>,
}

impl BundleError {
    pub fn new(entry: &Path, message: impl Into<String>) -> Self {
        Self {
            entry: entry.to_path_buf(),
            message: message.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: CapturedOutput) -> Self {
        self.output = Some(output);
        self
    }
}

fn render_output(output: &Option<CapturedOutput>) -> String {
    match output {
        Some(out) => format!("\n{}", out),
        None => String::new(),
    }
}

/// Produces deployable code for handler entry files.
///
/// Implementations:
/// - `StagingBundler` - copies the entry into a content-addressed directory
/// - `CommandBundler` - runs an external bundler process
pub trait Bundler {
    /// Bundle `entry` with `options`.
    ///
    /// The returned address must depend only on the entry content and the
    /// options: identical inputs yield the same `CodeRef`.
    fn bundle(&self, entry: &Path, options: &BundlingOptions) -> Result<CodeRef, BundleError>;
}
