use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::ast::OperationDefinition;
use crate::executors::map::ServiceMap;
use crate::response::graphql_error::GraphQLError;

/// The minimal schema surface the executor actually needs: which concrete
/// object types satisfy which abstract (interface/union) type condition.
/// Full schema parsing and validation stays out of scope; callers that
/// don't need abstract-type fragments at all can pass `SchemaMetadata::default()`.
#[derive(Debug, Clone, Default)]
pub struct SchemaMetadata {
    possible_types: HashMap<String, HashSet<String>>,
}

impl SchemaMetadata {
    pub fn new(possible_types: HashMap<String, HashSet<String>>) -> Self {
        Self { possible_types }
    }

    /// Whether `concrete_type` satisfies `type_condition` — true for an
    /// exact match, or when `concrete_type` is registered as one of
    /// `type_condition`'s possible types.
    pub fn satisfies(&self, concrete_type: &str, type_condition: &str) -> bool {
        concrete_type == type_condition
            || self
                .possible_types
                .get(type_condition)
                .is_some_and(|members| members.contains(concrete_type))
    }
}

/// The parsed client operation the response shaper re-walks once execution
/// finishes: the root operation node plus the fragment table it references.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub operation: OperationDefinition,
    pub schema: SchemaMetadata,
}

/// Request-scoped state threaded through a single plan execution. `tree`
/// and `errors` are mutexed rather than borrowed `&mut` because Parallel
/// nodes fan out concurrently; every lock is held only across a
/// synchronous read or merge, never across an `.await`, so under
/// cooperative polling no real contention is possible — see the
/// concurrency notes on `crate::interpreter`.
pub struct ExecutionContext<'a, C> {
    pub operation: &'a OperationContext,
    pub services: &'a ServiceMap<C>,
    pub request_context: &'a C,
    pub variables: &'a Option<Map<String, Value>>,
    pub(crate) tree: Mutex<Value>,
    pub(crate) errors: Mutex<Vec<GraphQLError>>,
}

impl<'a, C> ExecutionContext<'a, C> {
    pub fn new(
        operation: &'a OperationContext,
        services: &'a ServiceMap<C>,
        request_context: &'a C,
        variables: &'a Option<Map<String, Value>>,
    ) -> Self {
        Self {
            operation,
            services,
            request_context,
            variables,
            tree: Mutex::new(Value::Object(Map::new())),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_error(&self, error: GraphQLError) {
        self.errors.lock().unwrap().push(error);
    }
}
