//! Walks Sequence/Parallel/Flatten/Fetch nodes and drives the shared
//! working tree. Recursion goes through `Box::pin` because the four node
//! kinds are mutually recursive and async fns can't recurse directly
//! without heap indirection.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tracing::instrument;

use crate::context::ExecutionContext;
use crate::interpreter::fetch::execute_fetch;
use crate::plan::{PlanNode, ResponsePath};
use crate::response::graphql_error::GraphQLError;
use crate::traverse_path::{flatten_ref, Flattened};

#[instrument(level = "debug", skip_all, fields(path = ?path.0))]
pub fn execute_node<'a, 'x, C: Send + Sync>(
    ctx: &'a ExecutionContext<'x, C>,
    node: &'a PlanNode,
    path: ResponsePath,
) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        if slice_is_null(ctx, &path) {
            return;
        }
        match node {
            PlanNode::Sequence(sequence) => {
                for child in &sequence.nodes {
                    execute_node(ctx, child, path.clone()).await;
                }
            }
            PlanNode::Parallel(parallel) => {
                let mut jobs: FuturesUnordered<BoxFuture<'a, ()>> = FuturesUnordered::new();
                for child in &parallel.nodes {
                    jobs.push(execute_node(ctx, child, path.clone()));
                }
                while jobs.next().await.is_some() {}
            }
            PlanNode::Flatten(flatten) => {
                let next_path = path.extended(&flatten.path);
                execute_node(ctx, &flatten.node, next_path).await;
            }
            PlanNode::Fetch(fetch) => {
                if let Err(error) = execute_fetch(ctx, fetch, &path).await {
                    tracing::debug!(service = %fetch.service_name, %error, "fetch node failed");
                    ctx.push_error(GraphQLError::internal(error.to_string()));
                }
            }
        }
    })
}

/// Re-resolves `path` against the working tree and checks whether the
/// addressed slice is a bare `null` — the only case that skips a node
/// outright. A slice that fanned out over `@` into a (possibly empty) list
/// is never "null" in this sense; an empty list is simply a no-op once a
/// nested Fetch normalizes it to zero entities.
fn slice_is_null<C>(ctx: &ExecutionContext<'_, C>, path: &ResponsePath) -> bool {
    let tree = ctx.tree.lock().unwrap();
    matches!(flatten_ref(&tree, &path.0), Flattened::Single(v) if v.is_null())
}
