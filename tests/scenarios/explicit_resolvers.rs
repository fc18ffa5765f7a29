//! Scenario: resolvers created from explicit handler locations
//!
//! Covers entry resolution for `create_unit_resolver` and
//! `create_pipeline_stage`, plus the flat `load_all_resolvers` sweep.

use std::path::PathBuf;

use trellis::infrastructure::graph::RecordKind;
use trellis::{FieldKey, LoadAllOptions, ResolverOptions, TrellisError};

use crate::common::*;

#[test]
fn scenario_unit_resolver_from_default_directory() {
    let tree = ResolverTree::with_files(&["Query.me.js"]);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let handle = api
        .create_unit_resolver(&users, "Query", "me", &ResolverOptions::new())
        .unwrap();

    assert_eq!(handle.id(), "QueryMe");
    let binding = api.units().get(&FieldKey::new("Query", "me")).unwrap();
    assert_eq!(binding.entry_path, tree.root().join("Query.me.js"));
}

#[test]
fn scenario_ts_entry_wins_over_js_in_entry_dir() {
    let tree = ResolverTree::with_files(&["custom/Query.me.ts", "custom/Query.me.js"]);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = ResolverOptions::new().with_entry_dir(tree.root().join("custom"));
    api.create_unit_resolver(&users, "Query", "me", &options)
        .unwrap();

    let binding = api.units().get(&FieldKey::new("Query", "me")).unwrap();
    assert!(binding.entry_path.ends_with("custom/Query.me.ts"));
}

#[test]
fn scenario_invalid_extension_is_reported_before_existence() {
    let tree = ResolverTree::new();
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = ResolverOptions::new().with_entry_file(tree.root().join("missing.py"));
    let err = api
        .create_unit_resolver(&users, "Query", "me", &options)
        .unwrap_err();

    assert!(matches!(err, TrellisError::InvalidExtension { .. }), "got {err}");
    assert_eq!(api.graph().resolvers().count(), 0);
}

#[test]
fn scenario_entry_file_and_dir_together_conflict() {
    let tree = ResolverTree::with_files(&["Query.me.ts"]);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = ResolverOptions::new()
        .with_entry_file(tree.root().join("Query.me.ts"))
        .with_entry_dir(tree.root());
    let err = api
        .create_unit_resolver(&users, "Query", "me", &options)
        .unwrap_err();
    assert!(matches!(err, TrellisError::ConflictingOptions { .. }), "got {err}");

    let err = api
        .create_pipeline_stage(&users, "authorize", &options)
        .unwrap_err();
    assert!(matches!(err, TrellisError::ConflictingOptions { .. }), "got {err}");

    assert_eq!(api.graph().resolvers().count(), 0);
    assert_eq!(api.graph().functions().count(), 0);
    assert!(api.units().is_empty());
}

#[test]
fn scenario_missing_default_entry_lists_both_attempts() {
    let tree = ResolverTree::new();
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let err = api
        .create_unit_resolver(&users, "Query", "me", &ResolverOptions::new())
        .unwrap_err();
    match err {
        TrellisError::FileNotFound { attempted } => {
            let expected: Vec<PathBuf> = vec![
                tree.root().join("Query.me.ts"),
                tree.root().join("Query.me.js"),
            ];
            assert_eq!(attempted, expected);
        }
        other => panic!("expected FileNotFound, got {other}"),
    }
}

#[test]
fn scenario_explicit_unit_is_idempotent() {
    let tree = ResolverTree::with_files(&["Query.me.ts"]);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let first = api
        .create_unit_resolver(&users, "Query", "me", &ResolverOptions::new())
        .unwrap();
    let second = api
        .create_unit_resolver(&users, "Query", "me", &ResolverOptions::new())
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(api.graph().resolvers().count(), 1);
}

#[test]
fn scenario_explicit_unit_on_pipeline_field_conflicts() {
    let mut files = TWO_STAGE_PIPELINE.to_vec();
    files.push("Query.getUser.ts");
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let err = api
        .create_unit_resolver(&users, "Query", "getUser", &ResolverOptions::new())
        .unwrap_err();
    assert!(matches!(err, TrellisError::ResolverKindConflict { .. }), "got {err}");
}

#[test]
fn scenario_standalone_pipeline_stage() {
    let tree = ResolverTree::with_files(&["shared/authorize.ts"]);
    let mut api = tree.api();
    let auth = api.register_data_source("auth").unwrap();

    let options = ResolverOptions::new().with_entry_dir(tree.root().join("shared"));
    let stage = api
        .create_pipeline_stage(&auth, "authorize", &options)
        .unwrap();

    assert_eq!(stage.id(), "authorize");
    assert_eq!(stage.data_source(), "auth");
    let record = api.graph().function("authorize").unwrap();
    assert_eq!(record.data_source, "auth");
}

#[test]
fn scenario_load_all_creates_flat_units() {
    let tree = ResolverTree::new();
    for file in [
        "flat/Query.getUser.ts",
        "flat/Query.getUser.js",
        "flat/Mutation.updateUser.js",
        "flat/Query.tagged.[users].ts",
        "flat/Query.listOrders/1.fetch.[users].ts",
        "flat/notes.txt",
    ] {
        tree.write_project_file(file, HANDLER);
    }
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = LoadAllOptions::new().with_entry_dir(tree.project().join("flat"));
    let handles = api.load_all_resolvers(&users, &options).unwrap();

    let ids: Vec<&str> = handles.iter().map(|h| h.id()).collect();
    assert_eq!(ids, vec!["MutationUpdateUser", "QueryGetUser"]);

    let get_user = api.units().get(&FieldKey::new("Query", "getUser")).unwrap();
    assert!(get_user.entry_path.ends_with("Query.getUser.ts"));
    for handle in &handles {
        let record = api.graph().resolver(handle.id()).unwrap();
        assert_eq!(
            record.kind,
            RecordKind::Unit {
                data_source: "users".to_string()
            }
        );
    }

    let again = api.load_all_resolvers(&users, &options).unwrap();
    assert!(again.is_empty(), "second sweep creates nothing");
}

#[test]
fn scenario_load_all_missing_directory() {
    let tree = ResolverTree::new();
    let mut api = tree.api();
    let users = api.register_data_source("users").unwrap();

    let options = LoadAllOptions::new().with_entry_dir(tree.project().join("nowhere"));
    let err = api.load_all_resolvers(&users, &options).unwrap_err();
    assert!(matches!(err, TrellisError::DirectoryNotFound { .. }), "got {err}");
}
