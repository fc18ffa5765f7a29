//! Application Layer
//!
//! Use cases that orchestrate discovery and assembly.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Components
//!
//! - `GraphqlApi` - API root: one scan, then incremental data-source registration
//! - `ResolverAssembler` - plan-then-apply bridge to the Bundler and ResourceGraph
//! - `options` - operation options and explicit entry-path resolution

pub mod api;
pub mod assembler;
pub mod options;

pub use api::GraphqlApi;
pub use assembler::{
    pass_through_code, AppliedRegistration, PlannedPipeline, PlannedUnit, RegistrationPlan,
    ResolverAssembler, PASS_THROUGH_WRAPPER,
};
pub use options::{
    resolve_entry, ApiOptions, LoadAllOptions, ResolverOptions, DEFAULT_SUBDIR,
};
