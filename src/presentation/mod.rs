//! Presentation Layer
//!
//! Output formatting shared by the CLI and embedders:
//!
//! - `render` - text summaries of classifications and manifests
//! - `OutputFormat` - text or JSON

pub mod render;

pub use render::{render_classification, render_manifest};

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}
