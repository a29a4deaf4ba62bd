//! The client-facing error payload. Distinct from any internal Rust error
//! type used at plan-node boundaries (`crate::interpreter::PlanExecutionError`)
//! — this is what ends up serialized into the response's `errors` array.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DOWNSTREAM_SERVICE_ERROR_CODE;

/// A single segment of a GraphQL error `path`: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQLError {
    /// A plan-structural or extraction error: no downstream origin, no path.
    pub fn internal(message: impl Into<String>) -> Self {
        GraphQLError {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }

    /// Wraps an error reported by a downstream service's `process` call:
    /// fixed fields (`code`, `serviceName`, `query`, `variables`) are
    /// merged over whatever extensions the original error carried, and the
    /// original `path` is preserved verbatim.
    pub fn downstream(
        service_name: &str,
        query: &str,
        variables: &Map<String, Value>,
        original: GraphQLError,
    ) -> GraphQLError {
        let message = if original.message.trim().is_empty() {
            format!("Error while fetching subquery from service \"{service_name}\"")
        } else {
            original.message
        };

        let mut extensions = original.extensions.unwrap_or_default();
        extensions.insert(
            "code".to_string(),
            Value::String(DOWNSTREAM_SERVICE_ERROR_CODE.to_string()),
        );
        extensions.insert(
            "serviceName".to_string(),
            Value::String(service_name.to_string()),
        );
        extensions.insert("query".to_string(), Value::String(query.to_string()));
        extensions.insert("variables".to_string(), Value::Object(variables.clone()));

        GraphQLError {
            message,
            path: original.path,
            extensions: Some(extensions),
        }
    }
}
