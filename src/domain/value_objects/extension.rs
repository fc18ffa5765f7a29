//! Recognized handler source extensions

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Source extension of a handler file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceExtension {
    /// `.ts`
    Ts,
    /// `.js`
    Js,
}

impl SourceExtension {
    /// Lookup order used when deriving default entry files
    pub const ALL: [SourceExtension; 2] = [SourceExtension::Ts, SourceExtension::Js];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceExtension::Ts => "ts",
            SourceExtension::Js => "js",
        }
    }

    /// Parse a bare extension (no leading dot). Case-sensitive.
    pub fn parse(ext: &str) -> Option<Self> {
        match ext {
            "ts" => Some(SourceExtension::Ts),
            "js" => Some(SourceExtension::Js),
            _ => None,
        }
    }

    /// Position in [`Self::ALL`]; lower wins when both files exist
    pub fn rank(&self) -> usize {
        match self {
            SourceExtension::Ts => 0,
            SourceExtension::Js => 1,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }
}

impl fmt::Display for SourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
