//! JANUS Database — SurrealDB connection management and group store
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The SurrealDB group directory ([`SurrealGroupDirectory`])
//! - The group-ID mapping resolver ([`MappedGroupResolver`])
//! - Error types ([`DbError`])

mod connection;
mod directory;
mod error;
mod resolver;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use directory::SurrealGroupDirectory;
pub use error::DbError;
pub use resolver::MappedGroupResolver;
pub use schema::{run_migrations, schema_v1};
