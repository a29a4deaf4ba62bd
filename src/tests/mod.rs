//! End-to-end scenarios: a full plan driven through `execute` against
//! in-memory `DataSource` stubs, checked against the final client-facing
//! response.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::ast::{
    FieldSelection, InlineFragmentSelection, OperationDefinition, OperationKind, SelectionItem,
    SelectionSet,
};
use crate::context::{OperationContext, SchemaMetadata};
use crate::executors::common::{DataSource, SubgraphRequest, SubgraphResponse};
use crate::executors::map::ServiceMap;
use crate::interpreter::execute;
use crate::plan::{FetchNode, FlattenNode, ParallelNode, PlanNode, QueryPlan, ResponsePath, SequenceNode};
use crate::response::graphql_error::{GraphQLError, PathSegment};

fn field(name: &str) -> SelectionItem {
    SelectionItem::Field(FieldSelection {
        name: name.to_string(),
        alias: None,
        selections: SelectionSet::default(),
    })
}

fn field_with(name: &str, nested: SelectionSet) -> SelectionItem {
    SelectionItem::Field(FieldSelection {
        name: name.to_string(),
        alias: None,
        selections: nested,
    })
}

fn set(items: Vec<SelectionItem>) -> SelectionSet {
    SelectionSet { items }
}

fn operation_ctx(selection_set: SelectionSet) -> OperationContext {
    OperationContext {
        operation: OperationDefinition {
            operation_kind: OperationKind::Query,
            selection_set,
            fragments: BTreeMap::new(),
        },
        schema: SchemaMetadata::default(),
    }
}

/// A `DataSource` stub that always replies with the same canned response,
/// mirroring the `SubgraphExecutorMap`/in-memory map-executor pattern used
/// elsewhere in this codebase's test suites.
struct StaticService {
    response: SubgraphResponse,
}

#[async_trait]
impl<C: Send + Sync> DataSource<C> for StaticService {
    async fn process(&self, _request: SubgraphRequest, _context: &C) -> SubgraphResponse {
        self.response.clone()
    }
}

fn static_service(response: SubgraphResponse) -> Arc<dyn DataSource<()>> {
    Arc::new(StaticService { response })
}

fn data_response(data: serde_json::Value) -> SubgraphResponse {
    SubgraphResponse {
        data: Some(data),
        errors: None,
    }
}

#[tokio::test]
async fn single_root_fetch_shapes_requested_fields() {
    let plan = QueryPlan {
        node: Some(PlanNode::Fetch(FetchNode {
            service_name: "A".to_string(),
            selection_set: set(vec![field_with("me", set(vec![field("id"), field("name")]))]),
            variable_usages: BTreeMap::new(),
            requires: None,
        })),
    };

    let mut services = ServiceMap::new();
    services.insert(
        "A",
        static_service(data_response(json!({ "me": { "id": "1", "name": "Ada" } }))),
    );

    let operation = operation_ctx(set(vec![field_with("me", set(vec![field("name")]))]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(response.data, Some(json!({ "me": { "name": "Ada" } })));
    assert!(response.errors.is_none());
}

#[tokio::test]
async fn entity_fetch_aligns_by_representation_index() {
    let top_products_fetch = PlanNode::Fetch(FetchNode {
        service_name: "products".to_string(),
        selection_set: set(vec![field_with(
            "topProducts",
            set(vec![field("__typename"), field("upc")]),
        )]),
        variable_usages: BTreeMap::new(),
        requires: None,
    });

    let entity_fetch = PlanNode::Flatten(FlattenNode {
        path: ResponsePath(vec!["topProducts".to_string(), "@".to_string()]),
        node: Box::new(PlanNode::Fetch(FetchNode {
            service_name: "inventory".to_string(),
            selection_set: set(vec![field("name")]),
            variable_usages: BTreeMap::new(),
            requires: Some(set(vec![field("__typename"), field("upc")])),
        })),
    });

    let plan = QueryPlan {
        node: Some(PlanNode::Sequence(SequenceNode {
            nodes: vec![top_products_fetch, entity_fetch],
        })),
    };

    let mut services = ServiceMap::new();
    services.insert(
        "products",
        static_service(data_response(json!({
            "topProducts": [
                { "__typename": "Product", "upc": "a" },
                { "__typename": "Product", "upc": "b" },
            ]
        }))),
    );
    services.insert(
        "inventory",
        static_service(data_response(json!({
            "_entities": [{ "name": "Alpha" }, { "name": "Beta" }]
        }))),
    );

    let operation = operation_ctx(set(vec![field_with(
        "topProducts",
        set(vec![field("upc"), field("name")]),
    )]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(
        response.data,
        Some(json!({
            "topProducts": [
                { "upc": "a", "name": "Alpha" },
                { "upc": "b", "name": "Beta" },
            ]
        }))
    );
    assert!(response.errors.is_none());
}

#[tokio::test]
async fn parallel_fetches_merge_disjoint_fields() {
    let plan = QueryPlan {
        node: Some(PlanNode::Parallel(ParallelNode {
            nodes: vec![
                PlanNode::Fetch(FetchNode {
                    service_name: "A".to_string(),
                    selection_set: set(vec![field_with("me", set(vec![field("name")]))]),
                    variable_usages: BTreeMap::new(),
                    requires: None,
                }),
                PlanNode::Fetch(FetchNode {
                    service_name: "B".to_string(),
                    selection_set: set(vec![field_with("me", set(vec![field("email")]))]),
                    variable_usages: BTreeMap::new(),
                    requires: None,
                }),
            ],
        })),
    };

    let mut services = ServiceMap::new();
    services.insert(
        "A",
        static_service(data_response(json!({ "me": { "name": "Ada" } }))),
    );
    services.insert(
        "B",
        static_service(data_response(json!({ "me": { "email": "ada@example.com" } }))),
    );

    let operation = operation_ctx(set(vec![field_with(
        "me",
        set(vec![field("name"), field("email")]),
    )]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(
        response.data,
        Some(json!({ "me": { "name": "Ada", "email": "ada@example.com" } }))
    );
    assert!(response.errors.is_none());
}

#[tokio::test]
async fn downstream_error_preserves_partial_data() {
    let plan = QueryPlan {
        node: Some(PlanNode::Fetch(FetchNode {
            service_name: "A".to_string(),
            selection_set: set(vec![field("a"), field("b")]),
            variable_usages: BTreeMap::new(),
            requires: None,
        })),
    };

    let mut services = ServiceMap::new();
    services.insert(
        "A",
        static_service(SubgraphResponse {
            data: Some(json!({ "a": 1, "b": null })),
            errors: Some(vec![GraphQLError {
                message: "bad b".to_string(),
                path: Some(vec![PathSegment::Field("b".to_string())]),
                extensions: None,
            }]),
        }),
    );

    let operation = operation_ctx(set(vec![field("a"), field("b")]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(response.data, Some(json!({ "a": 1, "b": null })));
    let errors = response.errors.expect("downstream error should surface");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "bad b");
    assert_eq!(
        errors[0].path,
        Some(vec![PathSegment::Field("b".to_string())])
    );
    let extensions = errors[0].extensions.as_ref().unwrap();
    assert_eq!(extensions.get("code"), Some(&json!("DOWNSTREAM_SERVICE_ERROR")));
    assert_eq!(extensions.get("serviceName"), Some(&json!("A")));
}

#[tokio::test]
async fn entity_length_mismatch_skips_merge_and_records_error() {
    let top_products_fetch = PlanNode::Fetch(FetchNode {
        service_name: "products".to_string(),
        selection_set: set(vec![field_with(
            "topProducts",
            set(vec![field("__typename"), field("upc")]),
        )]),
        variable_usages: BTreeMap::new(),
        requires: None,
    });

    let entity_fetch = PlanNode::Flatten(FlattenNode {
        path: ResponsePath(vec!["topProducts".to_string(), "@".to_string()]),
        node: Box::new(PlanNode::Fetch(FetchNode {
            service_name: "inventory".to_string(),
            selection_set: set(vec![field("name")]),
            variable_usages: BTreeMap::new(),
            requires: Some(set(vec![field("__typename"), field("upc")])),
        })),
    });

    let plan = QueryPlan {
        node: Some(PlanNode::Sequence(SequenceNode {
            nodes: vec![top_products_fetch, entity_fetch],
        })),
    };

    let mut services = ServiceMap::new();
    services.insert(
        "products",
        static_service(data_response(json!({
            "topProducts": [
                { "__typename": "Product", "upc": "a" },
                { "__typename": "Product", "upc": "b" },
            ]
        }))),
    );
    services.insert(
        "inventory",
        static_service(data_response(json!({
            "_entities": [{ "name": "Alpha" }]
        }))),
    );

    let operation = operation_ctx(set(vec![field_with(
        "topProducts",
        set(vec![field("upc"), field("name")]),
    )]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(
        response.data,
        Some(json!({
            "topProducts": [
                { "upc": "a", "name": null },
                { "upc": "b", "name": null },
            ]
        }))
    );
    let errors = response.errors.expect("length mismatch should record an error");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("expected 2"));
}

#[tokio::test]
async fn unknown_service_does_not_block_siblings() {
    let plan = QueryPlan {
        node: Some(PlanNode::Parallel(ParallelNode {
            nodes: vec![
                PlanNode::Fetch(FetchNode {
                    service_name: "missing".to_string(),
                    selection_set: set(vec![field("ghost")]),
                    variable_usages: BTreeMap::new(),
                    requires: None,
                }),
                PlanNode::Fetch(FetchNode {
                    service_name: "A".to_string(),
                    selection_set: set(vec![field_with("me", set(vec![field("name")]))]),
                    variable_usages: BTreeMap::new(),
                    requires: None,
                }),
            ],
        })),
    };

    let mut services = ServiceMap::new();
    services.insert(
        "A",
        static_service(data_response(json!({ "me": { "name": "Ada" } }))),
    );

    let operation = operation_ctx(set(vec![field_with("me", set(vec![field("name")]))]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(response.data, Some(json!({ "me": { "name": "Ada" } })));
    let errors = response.errors.expect("unknown service should record an error");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("missing"));
}

#[tokio::test]
async fn inline_fragment_survives_entity_fetch_type_condition() {
    // Sanity check that InlineFragmentSelection wiring (used by both the
    // extractor and the shaper) is exercised end to end, not just in the
    // unit tests for each module in isolation.
    let plan = QueryPlan {
        node: Some(PlanNode::Fetch(FetchNode {
            service_name: "A".to_string(),
            selection_set: set(vec![SelectionItem::InlineFragment(
                InlineFragmentSelection {
                    type_condition: Some("Query".to_string()),
                    selections: set(vec![field("ok")]),
                },
            )]),
            variable_usages: BTreeMap::new(),
            requires: None,
        })),
    };

    let mut services = ServiceMap::new();
    services.insert("A", static_service(data_response(json!({ "ok": true }))));

    let operation = operation_ctx(set(vec![field("ok")]));
    let response = execute(&plan, &services, &(), &operation, None).await;

    assert_eq!(response.data, Some(json!({ "ok": true })));
}
