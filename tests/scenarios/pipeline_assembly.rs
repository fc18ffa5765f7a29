//! Scenario: pipelines assembled across data sources
//!
//! A `Type.field/` directory becomes one pipeline resolver. Each data source
//! registration contributes its own stages; the function list is always
//! sorted by order, and equal orders keep registration order.

use trellis::domain::entities::WrapperSource;
use trellis::infrastructure::graph::RecordKind;
use trellis::{CodeRef, FieldKey};

use crate::common::*;

fn pipeline_of(api: &trellis::GraphqlApi, resolver_id: &str) -> Vec<String> {
    api.graph()
        .pipeline(resolver_id)
        .unwrap_or_else(|| panic!("{resolver_id} is not a pipeline"))
        .to_vec()
}

#[test]
fn scenario_two_stage_pipeline_is_sorted_by_order() {
    let tree = ResolverTree::with_files(TWO_STAGE_PIPELINE);
    let mut api = tree.api();

    api.register_data_source("users").unwrap();

    assert_eq!(
        pipeline_of(&api, "QueryGetUser"),
        vec!["Query_getUser_users_fetch", "Query_getUser_users_format"]
    );

    let state = api
        .aggregator()
        .get(&FieldKey::new("Query", "getUser"))
        .unwrap();
    assert_eq!(state.wrapper(), WrapperSource::PassThrough);
    let orders: Vec<u64> = state.stages().iter().map(|s| s.descriptor.order).collect();
    assert_eq!(orders, vec![1, 2]);

    let fetch = api.graph().function("Query_getUser_users_fetch").unwrap();
    assert_eq!(fetch.name, "fetch");
    assert_eq!(fetch.data_source, "users");
    assert!(matches!(fetch.code, CodeRef::Asset { .. }));
}

#[test]
fn scenario_missing_wrapper_gets_pass_through() {
    let tree = ResolverTree::with_files(TWO_STAGE_PIPELINE);
    let mut api = tree.api();
    api.register_data_source("users").unwrap();

    let resolver = api.graph().resolver("QueryGetUser").unwrap();
    match &resolver.code {
        CodeRef::Inline { code } => {
            assert!(code.contains("return {};"));
            assert!(code.contains("ctx.prev.result"));
        }
        other => panic!("expected inline pass-through wrapper, got {other:?}"),
    }
}

#[test]
fn scenario_custom_wrapper_is_bundled() {
    let mut files = TWO_STAGE_PIPELINE.to_vec();
    files.push("Query.getUser/resolver.ts");
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();
    api.register_data_source("users").unwrap();

    let resolver = api.graph().resolver("QueryGetUser").unwrap();
    let CodeRef::Asset { path, .. } = &resolver.code else {
        panic!("expected bundled wrapper, got {:?}", resolver.code);
    };
    assert!(path.starts_with(tree.out_dir()));
    let artifact = std::fs::read_to_string(path).unwrap();
    assert!(artifact.contains("ctx.stash.startedAt"));

    let state = api
        .aggregator()
        .get(&FieldKey::new("Query", "getUser"))
        .unwrap();
    assert_eq!(state.wrapper(), WrapperSource::Custom);
}

#[test]
fn scenario_stages_merge_across_data_sources() {
    let tree = ResolverTree::with_files(MIXED_PIPELINE);
    let mut api = tree.api();

    api.register_data_source("auth").unwrap();
    assert_eq!(
        pipeline_of(&api, "QueryListOrders"),
        vec!["Query_listOrders_auth_auth", "Query_listOrders_auth_audit"]
    );

    api.register_data_source("users").unwrap();
    api.register_data_source("orders").unwrap();
    assert_eq!(
        pipeline_of(&api, "QueryListOrders"),
        vec![
            "Query_listOrders_auth_auth",
            "Query_listOrders_orders_fetch",
            "Query_listOrders_users_enrich",
            "Query_listOrders_auth_audit",
        ]
    );
    assert_eq!(api.graph().resolvers().count(), 1);
    assert_eq!(api.graph().functions().count(), 4);
}

#[test]
fn scenario_distinct_orders_make_registration_order_irrelevant() {
    let tree = ResolverTree::with_files(MIXED_PIPELINE);

    let mut forward = tree.api();
    for ds in ["auth", "orders", "users"] {
        forward.register_data_source(ds).unwrap();
    }
    let mut backward = tree.api();
    for ds in ["users", "orders", "auth"] {
        backward.register_data_source(ds).unwrap();
    }

    assert_eq!(
        pipeline_of(&forward, "QueryListOrders"),
        pipeline_of(&backward, "QueryListOrders")
    );
}

#[test]
fn scenario_equal_orders_keep_registration_order() {
    let files = ["Query.search/1.primary.[docs].ts", "Query.search/1.fallback.[cache].ts"];
    let tree = ResolverTree::with_files(&files);

    let mut api = tree.api();
    api.register_data_source("docs").unwrap();
    api.register_data_source("cache").unwrap();
    assert_eq!(
        pipeline_of(&api, "QuerySearch"),
        vec!["Query_search_docs_primary", "Query_search_cache_fallback"]
    );

    let mut api = tree.api();
    api.register_data_source("cache").unwrap();
    api.register_data_source("docs").unwrap();
    assert_eq!(
        pipeline_of(&api, "QuerySearch"),
        vec!["Query_search_cache_fallback", "Query_search_docs_primary"]
    );
}

#[test]
fn scenario_pipeline_activates_before_its_own_stages_arrive() {
    let tree = ResolverTree::with_files(TWO_STAGE_PIPELINE);
    let mut api = tree.api();

    api.register_data_source("orders").unwrap();
    let resolver = api.graph().resolver("QueryGetUser").unwrap();
    assert_eq!(
        resolver.kind,
        RecordKind::Pipeline {
            functions: Vec::new()
        }
    );

    api.register_data_source("users").unwrap();
    assert_eq!(pipeline_of(&api, "QueryGetUser").len(), 2);
}

#[test]
fn scenario_re_registration_adds_nothing() {
    let tree = ResolverTree::with_files(MIXED_PIPELINE);
    let mut api = tree.api();

    api.register_data_source("auth").unwrap();
    let before = pipeline_of(&api, "QueryListOrders");

    let (_, report) = api.register_data_source_with_report("auth").unwrap();
    assert!(report.units.is_empty());
    assert!(report.activated.is_empty());
    assert_eq!(report.merged_stages, 0);
    assert_eq!(pipeline_of(&api, "QueryListOrders"), before);
    assert_eq!(api.graph().data_sources(), ["auth".to_string()]);
}

#[test]
fn scenario_artifacts_are_content_addressed() {
    let files = ["Query.a/1.one.[x].ts", "Query.b/1.one.[x].ts"];
    let tree = ResolverTree::with_files(&files);
    let mut api = tree.api();
    api.register_data_source("x").unwrap();

    let a = &api.graph().function("Query_a_x_one").unwrap().code;
    let b = &api.graph().function("Query_b_x_one").unwrap().code;
    assert_eq!(a, b, "identical entry names and content share one artifact");
}
