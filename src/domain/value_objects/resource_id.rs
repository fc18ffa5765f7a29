//! Deterministic resource identifiers

use super::FieldKey;

/// Resolver identifier: `typeName` + capitalized `fieldName`.
///
/// `Query.getUser` becomes `QueryGetUser`.
pub fn resolver_id(field: &FieldKey) -> String {
    format!("{}{}", field.type_name(), capitalize(field.field_name()))
}

/// Pipeline function identifier, unique across data sources and stages.
pub fn function_id(field: &FieldKey, data_source: &str, stage: &str) -> String {
    format!(
        "{}_{}_{}_{}",
        field.type_name(),
        field.field_name(),
        data_source,
        stage
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
