//! Options for the API root and its explicit (non-discovery) operations
//!
//! Explicit operations locate their handler file as follows:
//!
//! 1. `entry_file`, which must carry a `.ts`/`.js` extension and exist
//! 2. `<dir>/<stem>.ts`
//! 3. `<dir>/<stem>.js`
//!
//! `<dir>` is `entry_dir` when given, otherwise the API's default directory.
//! `entry_file` and `entry_dir` are mutually exclusive.

use std::panic::Location;
use std::path::{Path, PathBuf};

use crate::domain::ports::{BundlingOptions, FileSystem};
use crate::domain::value_objects::SourceExtension;
use crate::error::{TrellisError, TrellisResult};

/// Fixed subfolder joined to the base directory
pub const DEFAULT_SUBDIR: &str = "resolvers";

/// Options for `create_unit_resolver` and `create_pipeline_stage`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    pub entry_file: Option<PathBuf>,
    pub entry_dir: Option<PathBuf>,
    /// Overrides the API-wide bundling options
    pub bundling: Option<BundlingOptions>,
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry_file = Some(path.into());
        self
    }

    pub fn with_entry_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry_dir = Some(path.into());
        self
    }

    pub fn with_bundling(mut self, bundling: BundlingOptions) -> Self {
        self.bundling = Some(bundling);
        self
    }
}

/// Options for `load_all_resolvers`
///
/// There is deliberately no entry file: bulk loading always reads a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadAllOptions {
    pub entry_dir: Option<PathBuf>,
    pub bundling: Option<BundlingOptions>,
}

impl LoadAllOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.entry_dir = Some(path.into());
        self
    }

    pub fn with_bundling(mut self, bundling: BundlingOptions) -> Self {
        self.bundling = Some(bundling);
        self
    }
}

/// Construction options for the API root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOptions {
    /// Convention root scanned at construction; defaults to the default directory
    pub root: Option<PathBuf>,
    /// Explicit base directory for the default resolver folder
    pub base_dir: Option<PathBuf>,
    /// Source file that constructed the options (see [`ApiOptions::from_caller`])
    pub origin: Option<PathBuf>,
    pub default_subdir: String,
    /// Bundling options used for discovered handlers
    pub bundling: BundlingOptions,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            root: None,
            base_dir: None,
            origin: None,
            default_subdir: DEFAULT_SUBDIR.to_string(),
            bundling: BundlingOptions::default(),
        }
    }
}

impl ApiOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the calling source file as the origin for the default directory.
    ///
    /// The location comes from `#[track_caller]` and is the path rustc saw
    /// when compiling the caller, usually relative to the workspace root. It
    /// only resolves when the process runs from that directory; every other
    /// setup must pass `base_dir` explicitly.
    #[track_caller]
    pub fn from_caller() -> Self {
        Self {
            origin: Some(PathBuf::from(Location::caller().file())),
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_bundling(mut self, bundling: BundlingOptions) -> Self {
        self.bundling = bundling;
        self
    }

    /// `<base_dir>/<subdir>`, else `<origin dir>/<subdir>`
    pub fn default_dir(&self) -> TrellisResult<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.join(&self.default_subdir));
        }
        match &self.origin {
            Some(origin) => match origin.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    Ok(parent.join(&self.default_subdir))
                }
                _ => Err(TrellisError::AmbiguousOrigin {
                    reason: format!("caller location {} has no directory", origin.display()),
                }),
            },
            None => Err(TrellisError::AmbiguousOrigin {
                reason: "no base directory configured and no caller location recorded"
                    .to_string(),
            }),
        }
    }

    /// Discovery root: explicit `root`, else the default directory
    pub fn discovery_root(&self) -> TrellisResult<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => self.default_dir(),
        }
    }
}

/// Locate the handler file for an explicit operation.
///
/// `default_dir` is only consulted when neither override is given.
pub fn resolve_entry<F, D>(
    fs: &F,
    entry_file: Option<&Path>,
    entry_dir: Option<&Path>,
    default_dir: D,
    stem: &str,
) -> TrellisResult<PathBuf>
where
    F: FileSystem + ?Sized,
    D: FnOnce() -> TrellisResult<PathBuf>,
{
    match (entry_file, entry_dir) {
        (Some(_), Some(_)) => Err(TrellisError::ConflictingOptions {
            first: "entry_file",
            second: "entry_dir",
        }),
        (Some(file), None) => {
            if SourceExtension::from_path(file).is_none() {
                return Err(TrellisError::InvalidExtension {
                    path: file.to_path_buf(),
                });
            }
            if !fs.is_file(file) {
                return Err(TrellisError::FileNotFound {
                    attempted: vec![file.to_path_buf()],
                });
            }
            Ok(file.to_path_buf())
        }
        (None, dir) => {
            let dir = match dir {
                Some(d) => d.to_path_buf(),
                None => default_dir()?,
            };
            let attempted: Vec<PathBuf> = SourceExtension::ALL
                .iter()
                .map(|ext| dir.join(format!("{}.{}", stem, ext)))
                .collect();
            attempted
                .iter()
                .find(|p| fs.is_file(p))
                .cloned()
                .ok_or(TrellisError::FileNotFound { attempted })
        }
    }
}
