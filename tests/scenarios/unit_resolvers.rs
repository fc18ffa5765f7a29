//! Scenario: tagged unit resolvers
//!
//! `Type.field.[dataSource].ts|js` files become single-step resolvers, each
//! created by the registration of its own data source only.

use trellis::infrastructure::graph::RecordKind;
use trellis::{FieldKey, TrellisError};

use crate::common::*;

#[test]
fn scenario_independent_units_bind_to_their_own_data_source() {
    let tree = ResolverTree::with_files(INDEPENDENT_UNITS);
    let mut api = tree.api();

    api.register_data_source("users").unwrap();
    assert!(api.graph().resolver("QueryGetUser").is_some());
    assert!(api.graph().resolver("MutationUpdateUser").is_none());

    api.register_data_source("orders").unwrap();
    let update = api.graph().resolver("MutationUpdateUser").unwrap();
    assert_eq!(
        update.kind,
        RecordKind::Unit {
            data_source: "orders".to_string()
        }
    );
    assert_eq!(update.type_name, "Mutation");
    assert_eq!(update.field_name, "updateUser");

    assert!(api.aggregator().is_empty(), "units never touch pipeline state");
    assert_eq!(api.units().len(), 2);
    assert_eq!(api.graph().functions().count(), 0);
}

#[test]
fn scenario_units_and_pipelines_coexist_on_distinct_fields() {
    let mut files = INDEPENDENT_UNITS.to_vec();
    files.extend_from_slice(MIXED_PIPELINE);
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    for ds in ["users", "orders", "auth"] {
        api.register_data_source(ds).unwrap();
    }

    assert_eq!(api.graph().resolvers().count(), 3);
    assert_eq!(api.units().len(), 2);
    assert_eq!(api.aggregator().len(), 1);
}

#[test]
fn scenario_same_field_tagged_twice_is_rejected() {
    let files = ["Query.getUser.[users].ts", "Query.getUser.[orders].js"];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    api.register_data_source("users").unwrap();
    let err = api.register_data_source("orders").unwrap_err();
    match err {
        TrellisError::DuplicateUnitResolver {
            field,
            existing_source,
            incoming_source,
            ..
        } => {
            assert_eq!(field, FieldKey::new("Query", "getUser"));
            assert_eq!(existing_source, "users");
            assert_eq!(incoming_source, "orders");
        }
        other => panic!("expected DuplicateUnitResolver, got {other}"),
    }
    assert_eq!(api.graph().data_sources(), ["users".to_string()]);
}

#[test]
fn scenario_unit_and_pipeline_on_same_field_conflict() {
    let files = ["Query.getUser.[users].ts", "Query.getUser/1.fetch.[users].ts"];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    let err = api.register_data_source("users").unwrap_err();
    assert!(
        matches!(err, TrellisError::ResolverKindConflict { ref field } if field.to_string() == "Query.getUser"),
        "got {err}"
    );
    assert_eq!(api.graph().resolvers().count(), 0);
}

#[test]
fn scenario_untagged_and_foreign_files_are_ignored() {
    let files = [
        "Query.getUser.ts",
        "Query.getUser.[users].py",
        "README.md",
        "helpers/format.ts",
    ];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    let (_, report) = api.register_data_source_with_report("users").unwrap();
    assert!(report.units.is_empty());
    assert_eq!(api.graph().resolvers().count(), 0);
}
