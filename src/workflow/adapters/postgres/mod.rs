//! `PostgreSQL` adapters for workflow version storage.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresWorkflowRepository, WorkflowPgPool};
