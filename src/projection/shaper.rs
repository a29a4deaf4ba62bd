//! Re-projects the working tree through the client's own operation document
//! so the final `data` payload has exactly the fields, aliases, and
//! ordering the client asked for — nothing a downstream service happened
//! to tack on survives.
//!
//! Schema parsing/validation isn't wired in here, so this shaper doesn't
//! resolve `__schema`/`__type` introspection fields; it's a direct
//! selection-set projector rather than a schema-aware field resolver. A
//! resolved value is never treated as callable — there is no notion of
//! field-resolver functions here, only data already materialized in the
//! working tree.

use serde_json::{Map, Value};
use tracing::instrument;

use crate::ast::{FieldSelection, OperationDefinition, SelectionItem, SelectionSet};
use crate::context::{OperationContext, SchemaMetadata};
use crate::projection::ShapingError;
use crate::TYPENAME_FIELD;

#[instrument(level = "debug", skip_all)]
pub fn shape(tree: &Value, operation_ctx: &OperationContext) -> Result<Value, ShapingError> {
    let operation = &operation_ctx.operation;
    let root_type = operation.operation_kind.root_type_name();
    shape_selection_set(
        tree,
        &operation.selection_set,
        operation,
        &operation_ctx.schema,
        root_type,
    )
}

fn shape_selection_set(
    value: &Value,
    selection: &SelectionSet,
    operation: &OperationDefinition,
    schema: &SchemaMetadata,
    current_type: &str,
) -> Result<Value, ShapingError> {
    let mut out = Map::new();
    shape_into(value, selection, operation, schema, current_type, &mut out)?;
    Ok(Value::Object(out))
}

fn shape_into(
    value: &Value,
    selection: &SelectionSet,
    operation: &OperationDefinition,
    schema: &SchemaMetadata,
    current_type: &str,
    out: &mut Map<String, Value>,
) -> Result<(), ShapingError> {
    for item in &selection.items {
        match item {
            SelectionItem::Field(field) => {
                let response_name = field.response_name();
                let resolved = value.get(response_name).cloned().unwrap_or(Value::Null);
                let shaped = shape_field_value(&resolved, field, operation, schema)?;
                out.insert(response_name.to_string(), shaped);
            }
            SelectionItem::InlineFragment(fragment) => {
                if type_condition_matches(value, &fragment.type_condition, schema, current_type) {
                    shape_into(
                        value,
                        &fragment.selections,
                        operation,
                        schema,
                        current_type,
                        out,
                    )?;
                }
            }
            SelectionItem::FragmentSpread(name) => {
                let fragment_def = operation
                    .fragments
                    .get(&name.0)
                    .ok_or_else(|| ShapingError::UnknownFragment(name.0.clone()))?;
                if type_condition_matches(
                    value,
                    &Some(fragment_def.type_condition.clone()),
                    schema,
                    current_type,
                ) {
                    shape_into(
                        value,
                        &fragment_def.selection_set,
                        operation,
                        schema,
                        current_type,
                        out,
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn type_condition_matches(
    value: &Value,
    type_condition: &Option<String>,
    schema: &SchemaMetadata,
    current_type: &str,
) -> bool {
    let Some(type_condition) = type_condition else {
        return true;
    };
    let actual_type = value
        .get(TYPENAME_FIELD)
        .and_then(Value::as_str)
        .unwrap_or(current_type);
    schema.satisfies(actual_type, type_condition)
}

fn shape_field_value(
    value: &Value,
    field: &FieldSelection,
    operation: &OperationDefinition,
    schema: &SchemaMetadata,
) -> Result<Value, ShapingError> {
    if field.selections.is_empty() {
        return Ok(value.clone());
    }
    match value {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(shape_field_value(item, field, operation, schema)?);
            }
            Ok(Value::Array(out))
        }
        other => {
            let nested_type = other
                .get(TYPENAME_FIELD)
                .and_then(Value::as_str)
                .unwrap_or(&field.name);
            shape_selection_set(other, &field.selections, operation, schema, nested_type)
        }
    }
}
