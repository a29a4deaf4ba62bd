pub mod representation;
pub mod shaper;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractionError {
    #[error("required field '{0}' is missing from the entity being projected")]
    MissingField(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ShapingError {
    #[error("unknown fragment '{0}' referenced in the client operation")]
    UnknownFragment(String),
}
