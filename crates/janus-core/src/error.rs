//! Error types for the JANUS system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JanusError {
    #[error("Group not found: {id}")]
    NotFound { id: String },

    #[error("Group already exists: {name} in domain {domain}")]
    AlreadyExists { name: String, domain: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type JanusResult<T> = Result<T, JanusError>;
