//! Builds and dispatches one downstream operation, validates the reply,
//! and merges it back into the working tree at the slice addressed by
//! `path`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::instrument;

use crate::ast::SelectionSet;
use crate::context::ExecutionContext;
use crate::deep_merge::deep_merge;
use crate::executors::common::SubgraphRequest;
use crate::interpreter::error::PlanExecutionError;
use crate::operation_builder::{build_entity_operation, build_root_operation};
use crate::plan::{FetchNode, ResponsePath};
use crate::projection::representation::project;
use crate::response::graphql_error::GraphQLError;
use crate::traverse_path::{flatten_mut, flatten_ref};
use crate::variables::assemble_variables;
use crate::{REPRESENTATIONS_VAR, TYPENAME_FIELD};

/// Which originating entity (by index into the slice) each kept
/// representation came from, in the order representations were sent.
struct EntityFetchPlan {
    kept_entity_indices: Vec<usize>,
}

#[instrument(
    level = "debug",
    skip_all,
    fields(service_name = fetch.service_name, path = ?path.0, is_entity_fetch = fetch.is_entity_fetch())
)]
pub async fn execute_fetch<C: Send + Sync>(
    ctx: &ExecutionContext<'_, C>,
    fetch: &FetchNode,
    path: &ResponsePath,
) -> Result<(), PlanExecutionError> {
    let service = ctx
        .services
        .get(&fetch.service_name)
        .ok_or_else(|| PlanExecutionError::UnknownService(fetch.service_name.clone()))?;

    let entities: Vec<Value> = {
        let tree = ctx.tree.lock().unwrap();
        flatten_ref(&tree, &path.0)
            .into_entities()
            .into_iter()
            .cloned()
            .collect()
    };
    if entities.is_empty() {
        return Ok(());
    }

    let mut downstream_variables = assemble_variables(&fetch.variable_usages, ctx.variables);

    let (query, entity_plan) = match &fetch.requires {
        None => {
            let query = build_root_operation(
                ctx.operation.operation.operation_kind,
                &fetch.selection_set,
                &fetch.variable_usages,
            );
            (query, None)
        }
        Some(requires) => {
            if client_supplied_representations(ctx.variables) {
                return Err(PlanExecutionError::ReservedVariableCollision);
            }
            match build_entity_plan(requires, &entities, ctx)? {
                None => return Ok(()),
                Some((representations, plan)) => {
                    downstream_variables
                        .insert(REPRESENTATIONS_VAR.to_string(), Value::Array(representations));
                    let query = build_entity_operation(&fetch.selection_set, &fetch.variable_usages);
                    (query, Some(plan))
                }
            }
        }
    };

    let request = SubgraphRequest {
        query: query.clone(),
        variables: downstream_variables.clone(),
    };
    let response = service.process(request, ctx.request_context).await;

    if let Some(errors) = response.errors {
        for error in errors {
            ctx.push_error(GraphQLError::downstream(
                &fetch.service_name,
                &query,
                &downstream_variables,
                error,
            ));
        }
    }

    let Some(data) = response.data else {
        return Ok(());
    };

    match entity_plan {
        None => merge_root_reply(ctx, path, data),
        Some(plan) => merge_entity_reply(ctx, path, data, &plan)?,
    }

    Ok(())
}

fn client_supplied_representations(
    client_variables: &Option<serde_json::Map<String, Value>>,
) -> bool {
    client_variables
        .as_ref()
        .is_some_and(|vars| vars.contains_key(REPRESENTATIONS_VAR))
}

/// Projects every entity in the slice through `requires`, keeps only the
/// ones whose projection has a populated `__typename`, and remembers which
/// original slice index each kept representation maps back to. Returns
/// `Ok(None)` when nothing survived — the downstream call is skipped
/// outright when the representations list would be empty.
fn build_entity_plan<C>(
    requires: &SelectionSet,
    entities: &[Value],
    ctx: &ExecutionContext<'_, C>,
) -> Result<Option<(Vec<Value>, EntityFetchPlan)>, PlanExecutionError> {
    let mut representations = Vec::new();
    let mut kept_entity_indices = Vec::new();
    for (index, entity) in entities.iter().enumerate() {
        let projected = project(entity, requires, &ctx.operation.schema)?;
        let has_typename = projected
            .get(TYPENAME_FIELD)
            .and_then(Value::as_str)
            .is_some();
        if has_typename {
            representations.push(projected);
            kept_entity_indices.push(index);
        }
    }
    if representations.is_empty() {
        return Ok(None);
    }
    Ok(Some((representations, EntityFetchPlan { kept_entity_indices })))
}

fn merge_root_reply<C>(ctx: &ExecutionContext<'_, C>, path: &ResponsePath, data: Value) {
    let mut tree = ctx.tree.lock().unwrap();
    for entity in flatten_mut(&mut tree, &path.0).into_entities() {
        deep_merge(entity, data.clone());
    }
}

fn merge_entity_reply<C>(
    ctx: &ExecutionContext<'_, C>,
    path: &ResponsePath,
    data: Value,
    plan: &EntityFetchPlan,
) -> Result<(), PlanExecutionError> {
    let entities_reply = data
        .get("_entities")
        .and_then(Value::as_array)
        .ok_or(PlanExecutionError::MissingEntitiesArray)?;
    if entities_reply.len() != plan.kept_entity_indices.len() {
        return Err(PlanExecutionError::EntityCountMismatch {
            expected: plan.kept_entity_indices.len(),
            actual: entities_reply.len(),
        });
    }

    let reply_index_by_entity: HashMap<usize, usize> = plan
        .kept_entity_indices
        .iter()
        .enumerate()
        .map(|(reply_index, &entity_index)| (entity_index, reply_index))
        .collect();

    let mut tree = ctx.tree.lock().unwrap();
    let slice = flatten_mut(&mut tree, &path.0).into_entities();
    for (entity_index, entity) in slice.into_iter().enumerate() {
        if let Some(&reply_index) = reply_index_by_entity.get(&entity_index) {
            deep_merge(entity, entities_reply[reply_index].clone());
        }
    }
    Ok(())
}
