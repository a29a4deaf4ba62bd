//! Variable assembly for a single fetch: project the client's variables
//! down to just the ones a fetch actually references.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::ast::VariableDefinition;

/// For each name the fetch declares in `variable_usages`, copies the
/// client-supplied value across if the client defined it at all (even an
/// explicit JSON `null` counts as defined); a name the client never
/// supplied is omitted entirely rather than passed through as `null`.
pub fn assemble_variables(
    variable_usages: &BTreeMap<String, VariableDefinition>,
    client_variables: &Option<Map<String, Value>>,
) -> Map<String, Value> {
    let mut out = Map::new();
    let Some(client_variables) = client_variables else {
        return out;
    };
    for name in variable_usages.keys() {
        if let Some(value) = client_variables.get(name) {
            out.insert(name.clone(), value.clone());
        }
    }
    out
}
