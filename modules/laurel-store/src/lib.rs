//! Postgres persistence for the achievement engine.
//!
//! The grant table's composite primary key is the single correctness
//! mechanism for at-most-once grants; writes go through
//! `INSERT … ON CONFLICT DO NOTHING` and concurrent attempts race safely.

pub mod catalog;
pub mod grants;
pub mod schema;

pub use catalog::DefinitionStore;
pub use grants::GrantStore;
pub use schema::ensure_schema;
