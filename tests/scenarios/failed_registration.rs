//! Scenario: registrations that fail leave no trace
//!
//! Validation and bundling happen before any resource is created, so a
//! rejected registration leaves the graph, the unit registry and every
//! pipeline exactly as they were.

use trellis::{
    ApiOptions, Bundler, BundlingOptions, CodeRef, FieldKey, GraphqlApi, InMemoryResourceGraph,
    LoadAllOptions, StagingBundler, TrellisError,
};

use crate::common::*;

#[test]
fn scenario_duplicate_stage_order_is_rejected_atomically() {
    let files = [
        "Query.getUser/1.fetch.[users].ts",
        "Query.getUser/1.load.[users].ts",
        "Query.me.[users].ts",
    ];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    let err = api.register_data_source("users").unwrap_err();
    match &err {
        TrellisError::DuplicateStageOrder {
            field,
            data_source,
            order,
            stages,
        } => {
            assert_eq!(field, &FieldKey::new("Query", "getUser"));
            assert_eq!(data_source, "users");
            assert_eq!(*order, 1);
            assert_eq!(stages, &vec!["fetch".to_string(), "load".to_string()]);
        }
        other => panic!("expected DuplicateStageOrder, got {other}"),
    }

    assert!(api.graph().data_sources().is_empty());
    assert_eq!(api.graph().resolvers().count(), 0);
    assert!(api.units().is_empty());
    assert!(api.aggregator().is_empty());
}

#[test]
fn scenario_same_order_on_different_data_sources_is_fine() {
    let files = [
        "Query.getUser/1.fetch.[users].ts",
        "Query.getUser/1.fetch.[cache].ts",
    ];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    api.register_data_source("users").unwrap();
    api.register_data_source("cache").unwrap();
    assert_eq!(
        api.graph().pipeline("QueryGetUser").unwrap(),
        ["Query_getUser_users_fetch", "Query_getUser_cache_fetch"]
    );
}

#[test]
fn scenario_duplicate_stage_name_is_rejected() {
    let files = [
        "Query.getUser/1.fetch.[users].ts",
        "Query.getUser/2.fetch.[users].js",
    ];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    let err = api.register_data_source("users").unwrap_err();
    assert!(
        matches!(err, TrellisError::DuplicateStageName { ref stage, .. } if stage == "fetch"),
        "got {err}"
    );
    assert!(api.graph().data_sources().is_empty());
}

#[test]
fn scenario_bundle_failure_creates_nothing() {
    let tree = ResolverTree::with_files(MIXED_PIPELINE);
    let blocker = tree.write_project_file("blocked", "not a directory");
    let mut api = GraphqlApi::new(
        tree.options(),
        Box::new(StagingBundler::new(blocker)),
        InMemoryResourceGraph::new(),
    )
    .unwrap();

    let err = api.register_data_source("auth").unwrap_err();
    assert!(matches!(err, TrellisError::Bundle(_)), "got {err}");
    assert!(api.graph().data_sources().is_empty());
    assert!(api.aggregator().is_empty());
}

#[test]
fn scenario_failed_registration_keeps_earlier_state() {
    let files = [
        "Query.getUser/1.fetch.[users].ts",
        "Query.getUser/1.first.[orders].ts",
        "Query.getUser/1.second.[orders].ts",
    ];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();

    api.register_data_source("users").unwrap();
    let before = api.graph().pipeline("QueryGetUser").unwrap().to_vec();

    api.register_data_source("orders").unwrap_err();
    assert_eq!(api.graph().pipeline("QueryGetUser").unwrap(), before);
    assert_eq!(api.graph().data_sources(), ["users".to_string()]);
    assert_eq!(api.graph().functions().count(), 1);
}

fn assert_collision(err: &TrellisError, expected_kind: &str, expected_id: &str) {
    match err {
        TrellisError::ResourceIdCollision { kind, id, .. } => {
            assert_eq!(*kind, expected_kind);
            assert_eq!(id, expected_id);
        }
        other => panic!("expected ResourceIdCollision, got {other}"),
    }
}

#[test]
fn scenario_resolver_id_collision_between_units_is_atomic() {
    let tree = ResolverTree::with_files(&["Query.GetUser.[users].ts", "Query.getUser.[users].ts"]);
    let mut api = tree.api();

    for _ in 0..2 {
        let err = api.register_data_source("users").unwrap_err();
        assert_collision(&err, "resolver", "QueryGetUser");
        assert!(err.to_string().contains("Query.GetUser"), "{err}");
        assert!(err.to_string().contains("Query.getUser"), "{err}");

        assert!(api.graph().data_sources().is_empty());
        assert_eq!(api.graph().resolvers().count(), 0);
        assert!(api.units().is_empty());
    }
}

#[test]
fn scenario_unit_colliding_with_pipeline_keeps_pipeline_inactive() {
    let tree = ResolverTree::with_files(&[
        "Query.getUser/1.fetch.[users].ts",
        "Query.GetUser.[users].ts",
    ]);
    let mut api = tree.api();

    let err = api.register_data_source("users").unwrap_err();
    assert_collision(&err, "resolver", "QueryGetUser");
    assert!(api.graph().data_sources().is_empty());
    assert_eq!(api.graph().resolvers().count(), 0);
    assert_eq!(api.graph().functions().count(), 0);
    assert!(api.units().is_empty());
    assert!(api.aggregator().is_empty());
}

#[test]
fn scenario_function_id_collision_across_fields_is_atomic() {
    let tree = ResolverTree::with_files(&[
        "A_b.c/1.fetch.[users].ts",
        "A.b_c/1.fetch.[users].ts",
    ]);
    let mut api = tree.api();

    let err = api.register_data_source("users").unwrap_err();
    assert_collision(&err, "function", "A_b_c_users_fetch");
    assert_eq!(api.graph().resolvers().count(), 0);
    assert_eq!(api.graph().functions().count(), 0);
    assert!(api.aggregator().is_empty());
}

#[test]
fn scenario_collision_with_earlier_registration_keeps_it() {
    let tree = ResolverTree::with_files(&["Query.getUser.[users].ts", "Query.GetUser.[orders].ts"]);
    let mut api = tree.api();

    api.register_data_source("users").unwrap();
    let err = api.register_data_source("orders").unwrap_err();
    assert_collision(&err, "resolver", "QueryGetUser");

    assert_eq!(api.graph().data_sources(), ["users".to_string()]);
    assert_eq!(api.units().len(), 1);
    assert!(api.units().get(&FieldKey::new("Query", "getUser")).is_some());
    assert!(api.units().get(&FieldKey::new("Query", "GetUser")).is_none());
}

#[test]
fn scenario_load_all_collision_creates_nothing() {
    let tree = ResolverTree::new();
    tree.write_project_file("flat/Query.GetUser.ts", HANDLER);
    tree.write_project_file("flat/Query.getUser.ts", HANDLER);
    tree.write_project_file("flat/Query.me.ts", HANDLER);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = LoadAllOptions::new().with_entry_dir(tree.project().join("flat"));
    let err = api.load_all_resolvers(&users, &options).unwrap_err();
    assert_collision(&err, "resolver", "QueryGetUser");
    assert_eq!(api.graph().resolvers().count(), 0);
    assert!(api.units().is_empty());
}

#[test]
fn scenario_load_all_collision_with_discovered_unit() {
    let tree = ResolverTree::with_files(&["Query.GetUser.[users].ts"]);
    tree.write_project_file("flat/Query.getUser.ts", HANDLER);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = LoadAllOptions::new().with_entry_dir(tree.project().join("flat"));
    let err = api.load_all_resolvers(&users, &options).unwrap_err();
    assert_collision(&err, "resolver", "QueryGetUser");
    assert_eq!(api.graph().resolvers().count(), 1);
    assert_eq!(api.units().len(), 1);
}

struct RefusingBundler;

impl Bundler for RefusingBundler {
    fn bundle(
        &self,
        entry: &std::path::Path,
        _: &BundlingOptions,
    ) -> Result<CodeRef, trellis::domain::ports::BundleError> {
        Err(trellis::domain::ports::BundleError::new(
            entry,
            "Could not resolve \"./missing\"",
        ))
    }
}

#[test]
fn scenario_bundler_message_reaches_caller_verbatim() {
    let tree = ResolverTree::with_files(INDEPENDENT_UNITS);
    let mut api = GraphqlApi::new(
        tree.options(),
        Box::new(RefusingBundler),
        InMemoryResourceGraph::new(),
    )
    .unwrap();

    let err = api.register_data_source("users").unwrap_err();
    assert!(err.to_string().contains("Could not resolve \"./missing\""));
}

#[test]
fn scenario_missing_root_is_reported() {
    let tree = ResolverTree::new();
    let options = ApiOptions::new().with_root(tree.project().join("absent"));
    let err = GraphqlApi::new(
        options,
        Box::new(RefusingBundler),
        InMemoryResourceGraph::new(),
    )
    .unwrap_err();
    assert!(matches!(err, TrellisError::DirectoryNotFound { .. }));
}
