//! Renders the two downstream operation shapes the Fetch Executor ever
//! issues: a root operation in the client's own operation type, or an
//! entity-fetch `_entities(representations: $representations) { ... }`
//! query. Query planning happens upstream of this crate, so there's no
//! general-purpose document printer here — just these two shapes.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::ast::{OperationKind, SelectionSet, VariableDefinition};
use crate::REPRESENTATIONS_VAR;

/// `$representations: [_Any!]!` — the synthetic variable every entity
/// fetch adds on top of its own `variableUsages`.
const REPRESENTATIONS_VAR_TYPE: &str = "[_Any!]!";

fn write_variable_defs(
    out: &mut String,
    leading: Option<(&str, &str)>,
    variable_usages: &BTreeMap<String, VariableDefinition>,
) {
    let has_any = leading.is_some() || !variable_usages.is_empty();
    if !has_any {
        return;
    }
    out.push('(');
    let mut first = true;
    if let Some((name, ty)) = leading {
        write!(out, "${name}: {ty}").unwrap();
        first = false;
    }
    for (name, def) in variable_usages {
        if !first {
            out.push_str(", ");
        }
        first = false;
        write!(out, "${name}: {}", def.variable_type).unwrap();
        if let Some(default_value) = &def.default_value {
            out.push_str(" = ");
            write_graphql_literal(out, default_value);
        }
    }
    out.push(')');
}

/// Writes a GraphQL `StringValue` literal. Only the characters the GraphQL
/// string grammar actually requires escaping get a `\` sequence; everything
/// else — including non-ASCII and non-BMP characters — is written through
/// as-is, since GraphQL source text is just UTF-8 and doesn't need `\uXXXX`
/// escapes for printable characters the way `{:?}` would produce them.
fn write_graphql_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32).unwrap(),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_graphql_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => write!(out, "{b}").unwrap(),
        Value::Number(n) => write!(out, "{n}").unwrap(),
        Value::String(s) => write_graphql_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_graphql_literal(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write!(out, "{key}: ").unwrap();
                write_graphql_literal(out, item);
            }
            out.push('}');
        }
    }
}

/// Root fetch: `<operationType> (<variableDefs>) <selectionSet>`.
pub fn build_root_operation(
    operation_kind: OperationKind,
    selection_set: &SelectionSet,
    variable_usages: &BTreeMap<String, VariableDefinition>,
) -> String {
    let mut out = String::new();
    out.push_str(operation_kind.keyword());
    out.push(' ');
    write_variable_defs(&mut out, None, variable_usages);
    if !variable_usages.is_empty() {
        out.push(' ');
    }
    write!(out, "{selection_set}").unwrap();
    out
}

/// Entity fetch: always a `query`, regardless of the client operation's
/// own kind — `_entities` is itself a query-type root field.
pub fn build_entity_operation(
    selection_set: &SelectionSet,
    variable_usages: &BTreeMap<String, VariableDefinition>,
) -> String {
    let mut out = String::new();
    out.push_str("query ");
    write_variable_defs(
        &mut out,
        Some((REPRESENTATIONS_VAR, REPRESENTATIONS_VAR_TYPE)),
        variable_usages,
    );
    write!(
        out,
        " {{ _entities(representations: ${REPRESENTATIONS_VAR}) {selection_set} }}"
    )
    .unwrap();
    out
}
