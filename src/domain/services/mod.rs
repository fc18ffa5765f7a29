//! Domain Services
//!
//! Stateless grammar and classification, plus the stateful pipeline
//! aggregator and unit registry. None of these touch the file system.

pub mod aggregator;
pub mod classifier;
pub mod grammar;
pub mod unit_registry;

pub use aggregator::PipelineAggregator;
pub use classifier::{classify, referenced_data_sources, Classification};
pub use unit_registry::{UnitBinding, UnitRegistry};
