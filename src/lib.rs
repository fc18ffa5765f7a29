//! Trellis - convention-based resolver and pipeline assembler
//!
//! Trellis discovers request handlers for the fields of a typed API schema
//! purely from file and directory names, then assembles them into unit
//! resolvers and ordered pipelines as data sources are registered one by one.
//!
//! ```text
//! resolvers/
//!   Query.getUser.[users].ts        unit resolver on data source `users`
//!   Query.listOrders/               pipeline field
//!     resolver.ts                   optional wrapper
//!     1.auth.[auth].ts              stage 1 on `auth`
//!     2.fetch.[orders].ts           stage 2 on `orders`
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{ApiOptions, GraphqlApi, LoadAllOptions, ResolverOptions};
pub use config::Config;
pub use domain::ports::{
    Bundler, BundlingOptions, CodeRef, DataSourceHandle, ResolverHandle, ResourceGraph,
    StageHandle,
};
pub use domain::value_objects::FieldKey;
pub use error::{TrellisError, TrellisResult};
pub use infrastructure::{CommandBundler, InMemoryResourceGraph, StagingBundler};
