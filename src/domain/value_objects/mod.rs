//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod extension;
mod field_key;
mod hash;
pub mod resource_id;

pub use extension::SourceExtension;
pub use field_key::FieldKey;
pub use hash::ContentHash;
