//! Bundler adapters
//!
//! Both adapters content-address their artifacts: the address is the hash of
//! the entry file (name and bytes) plus the bundling options. An artifact
//! already present at that address is returned without rebuilding.

mod command;
mod staging;

use std::path::{Path, PathBuf};

pub use command::CommandBundler;
pub use staging::StagingBundler;

use crate::domain::ports::{Bundler, BundlingOptions};
use crate::domain::value_objects::ContentHash;

/// Address of an entry file's artifact
pub fn content_address(entry: &Path, bytes: &[u8], options: &BundlingOptions) -> ContentHash {
    let name = entry
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ContentHash::from_parts(&[name.as_bytes(), bytes, options.fingerprint().as_bytes()])
}

/// Artifact location for an address
pub(crate) fn artifact_path(out_dir: &Path, hash: &ContentHash, ext: &str) -> PathBuf {
    out_dir.join(hash.short()).join(format!("index.{}", ext))
}

/// Pick the bundler for a configuration.
///
/// An empty `command` selects the staging bundler.
pub fn select(out_dir: PathBuf, command: &[String]) -> Box<dyn Bundler> {
    match command.split_first() {
        Some((program, args)) => Box::new(
            CommandBundler::new(program.clone(), out_dir).with_args(args.to_vec()),
        ),
        None => Box::new(StagingBundler::new(out_dir)),
    }
}
