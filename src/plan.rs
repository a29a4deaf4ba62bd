use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ast::{SelectionSet, VariableDefinition};

/// The literal list marker a `FlattenNode` path uses to denote "descend
/// into every element of the array found here".
pub const LIST_MARKER: &str = "@";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponsePath(pub Vec<String>);

impl ResponsePath {
    pub fn extended(&self, suffix: &ResponsePath) -> ResponsePath {
        let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
        ResponsePath(segments)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryPlan {
    #[serde(default)]
    pub node: Option<PlanNode>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum PlanNode {
    Sequence(SequenceNode),
    Parallel(ParallelNode),
    Flatten(FlattenNode),
    Fetch(FetchNode),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SequenceNode {
    pub nodes: Vec<PlanNode>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParallelNode {
    pub nodes: Vec<PlanNode>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlattenNode {
    pub path: ResponsePath,
    pub node: Box<PlanNode>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNode {
    pub service_name: String,
    pub selection_set: SelectionSet,
    #[serde(default)]
    pub variable_usages: BTreeMap<String, VariableDefinition>,
    /// Present only for an entity fetch: the selection the Representation
    /// Extractor projects out of each entity in the slice to build the
    /// `_entities` call's representations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub requires: Option<SelectionSet>,
}

impl FetchNode {
    pub fn is_entity_fetch(&self) -> bool {
        self.requires.is_some()
    }
}
