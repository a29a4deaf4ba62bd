use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SelectionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    /// The root type name an executable operation of this kind targets,
    /// used only to seed `__typename` resolution during response shaping —
    /// schema-declared root type renames are out of scope.
    pub fn root_type_name(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

/// A variable as referenced by a downstream fetch, carrying just enough of
/// its declared type to re-render a `$name: Type` variable definition in a
/// subgraph request document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    pub variable_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FragmentDefinition {
    pub type_condition: String,
    pub selection_set: SelectionSet,
}

/// The client's parsed operation, as consumed by the response shaper. The
/// plan itself carries its own (already-normalized) selection sets, so this
/// is only ever walked after execution completes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OperationDefinition {
    pub operation_kind: OperationKind,
    pub selection_set: SelectionSet,
    #[serde(default)]
    pub fragments: BTreeMap<String, FragmentDefinition>,
}
