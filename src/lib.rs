pub mod ast;
pub mod context;
pub mod deep_merge;
pub mod executors;
pub mod interpreter;
pub mod operation_builder;
pub mod plan;
pub mod projection;
pub mod response;
pub mod traverse_path;
pub mod variables;

pub use context::ExecutionContext;
pub use executors::common::{DataSource, SubgraphRequest, SubgraphResponse};
pub use executors::map::ServiceMap;
pub use interpreter::{execute, ExecutionResponse};
pub use response::graphql_error::GraphQLError;

pub(crate) const TYPENAME_FIELD: &str = "__typename";
pub(crate) const REPRESENTATIONS_VAR: &str = "representations";
pub(crate) const DOWNSTREAM_SERVICE_ERROR_CODE: &str = "DOWNSTREAM_SERVICE_ERROR";

#[cfg(test)]
mod tests;
