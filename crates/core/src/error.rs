use crate::types::DbId;

/// Domain-level error type shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
