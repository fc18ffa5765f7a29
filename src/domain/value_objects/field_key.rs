//! Field key value object
//!
//! Identifies the resolver slot of one schema field.

use std::fmt;

use serde::Serialize;

/// `(typeName, fieldName)` pair identifying a schema field's resolver slot.
///
/// Comparison is case-sensitive and no normalization is applied. The pair is
/// kept as two separate strings so that names containing `.` can never
/// collide with each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FieldKey {
    type_name: String,
    field_name: String,
}

impl FieldKey {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// File stem used by the flat naming convention (`Type.field`)
    pub fn file_stem(&self) -> String {
        format!("{}.{}", self.type_name, self.field_name)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}
