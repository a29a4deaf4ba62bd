//! Ties the Plan Interpreter, Fetch Executor, and Response Shaper together
//! behind the crate's single entry point.

pub mod error;
mod fetch;
mod node;

pub use error::PlanExecutionError;

use serde_json::{Map, Value};
use tracing::instrument;

use crate::context::{ExecutionContext, OperationContext};
use crate::executors::map::ServiceMap;
use crate::plan::{QueryPlan, ResponsePath};
use crate::projection::shaper;
use crate::response::graphql_error::GraphQLError;

/// The executor's final, client-facing payload: `{data}` when clean,
/// `{data, errors}` when something was collected along the way but shaping
/// still succeeded, `{errors}` only if shaping itself failed — in which
/// case every previously collected error is discarded. This mirrors an
/// acknowledged rough edge in the source behavior rather than a more
/// forgiving alternative that would surface both.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResponse {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[instrument(level = "debug", skip_all, name = "execute")]
pub async fn execute<C: Send + Sync>(
    plan: &QueryPlan,
    services: &ServiceMap<C>,
    request_context: &C,
    operation: &OperationContext,
    variables: Option<Map<String, Value>>,
) -> ExecutionResponse {
    let exec_ctx = ExecutionContext::new(operation, services, request_context, &variables);

    if let Some(root) = &plan.node {
        node::execute_node(&exec_ctx, root, ResponsePath::default()).await;
    }

    let tree = exec_ctx.tree.into_inner().unwrap();
    let errors = exec_ctx.errors.into_inner().unwrap();

    match shaper::shape(&tree, operation) {
        Ok(data) => ExecutionResponse {
            data: Some(data),
            errors: if errors.is_empty() { None } else { Some(errors) },
        },
        Err(shaping_error) => ExecutionResponse {
            data: None,
            errors: Some(vec![GraphQLError::internal(shaping_error.to_string())]),
        },
    }
}
