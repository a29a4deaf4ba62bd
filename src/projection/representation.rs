//! Projects a single entity object through a `requires` selection set to
//! build the minimal representation sent to a downstream service for
//! entity resolution.

use serde_json::{Map, Value};
use tracing::instrument;

use crate::ast::{SelectionItem, SelectionSet};
use crate::context::SchemaMetadata;
use crate::projection::ExtractionError;
use crate::TYPENAME_FIELD;

/// Projects `entity` through `selection`. Fails if a required field was
/// never materialized on the entity — that's an invariant violation by an
/// earlier plan step, not a recoverable condition.
#[instrument(level = "trace", skip_all)]
pub fn project(
    entity: &Value,
    selection: &SelectionSet,
    schema: &SchemaMetadata,
) -> Result<Value, ExtractionError> {
    let mut out = Map::new();
    project_into(entity, selection, schema, &mut out)?;
    Ok(Value::Object(out))
}

fn project_into(
    entity: &Value,
    selection: &SelectionSet,
    schema: &SchemaMetadata,
    out: &mut Map<String, Value>,
) -> Result<(), ExtractionError> {
    for item in &selection.items {
        match item {
            SelectionItem::Field(field) => {
                let response_name = field.response_name();
                let value = entity.get(response_name).ok_or_else(|| {
                    ExtractionError::MissingField(response_name.to_string())
                })?;
                let projected = project_value(value, &field.selections, schema)?;
                out.insert(response_name.to_string(), projected);
            }
            SelectionItem::InlineFragment(fragment) => {
                let Some(type_condition) = &fragment.type_condition else {
                    continue;
                };
                let typename = entity.get(TYPENAME_FIELD).and_then(Value::as_str);
                let matches = typename
                    .map(|t| schema.satisfies(t, type_condition))
                    .unwrap_or(false);
                if matches {
                    project_into(entity, &fragment.selections, schema, out)?;
                }
            }
            SelectionItem::FragmentSpread(_) => {
                // `requires` selection sets are plan-internal and never
                // contain named fragment spreads; only the client's own
                // operation document does (handled by the shaper).
            }
        }
    }
    Ok(())
}

fn project_value(
    value: &Value,
    nested: &SelectionSet,
    schema: &SchemaMetadata,
) -> Result<Value, ExtractionError> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(project_value(item, nested, schema)?);
            }
            Ok(Value::Array(out))
        }
        other => {
            if nested.is_empty() {
                Ok(other.clone())
            } else {
                project(other, nested, schema)
            }
        }
    }
}
