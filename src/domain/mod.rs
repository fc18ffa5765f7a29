//! Domain Layer
//!
//! The core of Trellis - resolver discovery and pipeline aggregation without
//! I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Snapshot, descriptors, pipeline state
//! - `value_objects/` - Immutable value types (FieldKey, SourceExtension, ContentHash)
//! - `services/` - Grammar, classifier, aggregator
//! - `ports/` - Interface definitions for infrastructure (Bundler, ResourceGraph, FileSystem)
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
