#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),
}
