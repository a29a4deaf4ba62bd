//! Internal, Rust-level errors raised at a plan node's boundary. These
//! never escape the executor: `node.rs` catches every one of them, records
//! a [`crate::response::graphql_error::GraphQLError`] on the context, and
//! lets sibling/parent nodes continue. Distinct from `GraphQLError`, which
//! is the client-facing payload these get turned into.

use crate::projection::ExtractionError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanExecutionError {
    #[error("no DataSource registered for service '{0}'")]
    UnknownService(String),

    #[error("client supplied a reserved variable name 'representations'")]
    ReservedVariableCollision,

    #[error(
        "entity fetch reply had {actual} entities, expected {expected} (one per kept representation)"
    )]
    EntityCountMismatch { expected: usize, actual: usize },

    #[error("entity fetch reply is missing the '_entities' array")]
    MissingEntitiesArray,

    #[error("representation extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}
