//! Cross-cutting error types.
//!
//! Storage errors live in `ocd-db` (`DatabaseError`) and configuration errors
//! in `ocd-config`. Everything converges on `anyhow` in the `ocd` binary.

use thiserror::Error;

/// Errors that can be raised by any OCD crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// An item status change that the board does not allow.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (payload shape, agent mismatch, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
