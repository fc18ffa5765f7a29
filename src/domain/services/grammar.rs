//! Path convention grammar
//!
//! Pure parsing of file and directory names into structured tokens:
//!
//! | Pattern | Token |
//! |---|---|
//! | `Type.field.[dataSource].ts\|js` | unit resolver |
//! | `Type.field/` (directory) | pipeline field |
//! | `Type.field/resolver.ts\|js` | pipeline wrapper |
//! | `Type.field/NNN.stage.[dataSource].ts\|js` | pipeline stage |
//!
//! `Type` and `field` are schema names (`[A-Za-z_][A-Za-z0-9_]*`), so a stage
//! file whose first segment is numeric can never read as a unit resolver.
//! Names that do not match return `None`; they are skipped, never an error.

use crate::domain::value_objects::{FieldKey, SourceExtension};

/// File name of the optional pipeline wrapper (without extension)
pub const WRAPPER_STEM: &str = "resolver";

/// Parsed `Type.field.[dataSource].ext`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResolverName {
    pub field: FieldKey,
    pub data_source: String,
    pub extension: SourceExtension,
}

/// Parsed `NNN.stage.[dataSource].ext`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageName {
    pub order: u64,
    pub stage_name: String,
    pub data_source: String,
    pub extension: SourceExtension,
}

/// Any name recognized by the discovery grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    UnitResolver(UnitResolverName),
    PipelineField(FieldKey),
    PipelineStage(StageName),
    PipelineWrapper(SourceExtension),
}

/// Parse a name of the discovery grammar.
///
/// Directories can only be pipeline fields; files are tried against the
/// unit, stage and wrapper patterns, which are disjoint.
pub fn parse(name: &str, is_directory: bool) -> Option<Token> {
    if is_directory {
        return parse_pipeline_dir(name).map(Token::PipelineField);
    }
    parse_unit_resolver(name)
        .map(Token::UnitResolver)
        .or_else(|| parse_stage(name).map(Token::PipelineStage))
        .or_else(|| parse_wrapper(name).map(Token::PipelineWrapper))
}

/// `Type.field.[dataSource].ts|js`
pub fn parse_unit_resolver(name: &str) -> Option<UnitResolverName> {
    let (stem, extension) = split_extension(name)?;
    let mut parts = stem.split('.');
    let type_name = parts.next().filter(|s| is_schema_name(s))?;
    let field_name = parts.next().filter(|s| is_schema_name(s))?;
    let data_source = parts.next().and_then(parse_data_source_tag)?;
    if parts.next().is_some() {
        return None;
    }
    Some(UnitResolverName {
        field: FieldKey::new(type_name, field_name),
        data_source: data_source.to_string(),
        extension,
    })
}

/// `Type.field` (directory name)
pub fn parse_pipeline_dir(name: &str) -> Option<FieldKey> {
    let (type_name, field_name) = name.split_once('.')?;
    if is_schema_name(type_name) && is_schema_name(field_name) {
        Some(FieldKey::new(type_name, field_name))
    } else {
        None
    }
}

/// `NNN.stage.[dataSource].ts|js`
pub fn parse_stage(name: &str) -> Option<StageName> {
    let (stem, extension) = split_extension(name)?;
    let mut parts = stem.split('.');
    let order = parts.next().and_then(parse_order)?;
    let stage_name = parts.next().filter(|s| is_stage_name(s))?;
    let data_source = parts.next().and_then(parse_data_source_tag)?;
    if parts.next().is_some() {
        return None;
    }
    Some(StageName {
        order,
        stage_name: stage_name.to_string(),
        data_source: data_source.to_string(),
        extension,
    })
}

/// `resolver.ts|js`
pub fn parse_wrapper(name: &str) -> Option<SourceExtension> {
    let (stem, extension) = split_extension(name)?;
    (stem == WRAPPER_STEM).then_some(extension)
}

/// Flat `Type.field.ts|js`, used by bulk loading (no data-source tag)
pub fn parse_flat_resolver(name: &str) -> Option<(FieldKey, SourceExtension)> {
    let (stem, extension) = split_extension(name)?;
    parse_pipeline_dir(stem).map(|field| (field, extension))
}

fn split_extension(name: &str) -> Option<(&str, SourceExtension)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let extension = SourceExtension::parse(ext)?;
    Some((stem, extension))
}

fn parse_data_source_tag(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('[')?.strip_suffix(']')?;
    let valid = !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(inner)
}

fn parse_order(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn is_schema_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_stage_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
