//! Database-specific error types and conversions.

use janus_core::error::JanusError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Group not found: {id}")]
    NotFound { id: String },

    #[error("Group already exists: {name} in domain {domain}")]
    AlreadyExists { name: String, domain: String },

    #[error("Unsupported filter field: {0}")]
    UnsupportedFilter(String),
}

impl From<DbError> for JanusError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id } => JanusError::NotFound { id },
            DbError::AlreadyExists { name, domain } => JanusError::AlreadyExists { name, domain },
            DbError::UnsupportedFilter(field) => JanusError::Validation {
                message: format!("unsupported filter field: {field}"),
            },
            other => JanusError::Directory(other.to_string()),
        }
    }
}
