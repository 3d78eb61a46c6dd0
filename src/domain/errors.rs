//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Resource not found
    #[error("Resource not found")]
    NotFound,
    /// Argument rejected by an entity constructor
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Stored row could not be mapped back to an entity
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    /// Token or hashing failure
    #[error("Security error: {0}")]
    Security(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
