//! External command bundler
//!
//! Runs an esbuild-compatible CLI:
//!
//! ```text
//! <program> [args...] <entry> --bundle --format=esm --platform=node --outfile=<artifact> [--sourcemap=inline]
//! ```
//!
//! On failure the process output is captured into the `BundleError`.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::{artifact_path, content_address};
use crate::domain::ports::{
    BundleError, Bundler, BundlingOptions, CapturedOutput, CodeRef, FileSystem,
};
use crate::infrastructure::fs::LocalFs;

/// Bundler delegating to an external process
#[derive(Debug, Clone)]
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    out_dir: PathBuf,
    fs: LocalFs,
}

impl CommandBundler {
    pub fn new(program: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            out_dir: out_dir.into(),
            fs: LocalFs::new(),
        }
    }

    /// Extra arguments placed before the entry path
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn command(&self, entry: &Path, artifact: &Path, options: &BundlingOptions) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(entry)
            .arg("--bundle")
            .arg("--format=esm")
            .arg("--platform=node")
            .arg(format!("--outfile={}", artifact.display()));
        if !options.exclude_source_map {
            cmd.arg("--sourcemap=inline");
        }
        cmd
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, entry: &Path, options: &BundlingOptions) -> Result<CodeRef, BundleError> {
        let bytes = self
            .fs
            .read(entry)
            .map_err(|e| BundleError::new(entry, e.to_string()))?;
        let hash = content_address(entry, &bytes, options);
        let path = artifact_path(&self.out_dir, &hash, "js");

        if self.fs.is_file(&path) {
            debug!(entry = %entry.display(), hash = hash.short(), "Bundle cache hit");
            return Ok(CodeRef::Asset { hash, path });
        }

        if let Some(parent) = path.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| BundleError::new(entry, e.to_string()))?;
        }

        info!(program = %self.program, entry = %entry.display(), "Running bundler");
        let output = self
            .command(entry, &path, options)
            .output()
            .map_err(|e| BundleError::new(entry, format!("failed to run {}: {}", self.program, e)))?;

        let captured = CapturedOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(
                BundleError::new(entry, format!("{} exited with failure", self.program))
                    .with_output(captured),
            );
        }
        if !self.fs.is_file(&path) {
            return Err(BundleError::new(
                entry,
                format!("{} did not produce {}", self.program, path.display()),
            )
            .with_output(captured));
        }

        Ok(CodeRef::Asset { hash, path })
    }
}
