//! The abstract downstream-service boundary. Transport, retries, and
//! authentication are the surrounding router's concern; this crate only
//! needs something it can hand a request to and get a reply back from.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::response::graphql_error::GraphQLError;

/// The request the Fetch Executor builds for one downstream operation: a
/// serialized operation document plus its variables.
#[derive(Debug, Clone)]
pub struct SubgraphRequest {
    pub query: String,
    pub variables: Map<String, Value>,
}

/// A downstream service's reply, mirroring a standard GraphQL response.
#[derive(Debug, Clone, Default)]
pub struct SubgraphResponse {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQLError>>,
}

/// One downstream data service. `process` is the single operation this
/// crate requires of it — everything else (HTTP, gRPC, in-process) is the
/// caller's choice of implementation.
#[async_trait]
pub trait DataSource<C>: Send + Sync {
    async fn process(&self, request: SubgraphRequest, context: &C) -> SubgraphResponse;
}
