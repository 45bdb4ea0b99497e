//! Storage layer for the civilization bot.
//!
//! All durable game state lives in `PostgreSQL`; each webhook invocation is
//! stateless. Every balance mutation is expressed as a single conditional
//! or atomic SQL statement (upsert-increment for accrual, guarded updates
//! for purchases, one transaction for the two-sided raid transfer) so that
//! concurrent messages for the same group can never lose an increment.
//!
//! [`GroupStore`] is an enum over the production `PostgreSQL` backend and an
//! in-memory fake with identical semantics, used by unit and integration
//! tests. Enum dispatch avoids the dyn-compatibility issues of async trait
//! methods.
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`group_store`] -- The [`GroupStore`] dispatch enum and SQL backend
//! - [`memory`] -- In-memory fake store for tests
//! - [`error`] -- Shared error types ([`DbError`])

pub mod error;
pub mod group_store;
pub mod memory;
pub mod postgres;

// Re-export primary types for convenience.
pub use error::DbError;
pub use group_store::{GroupStore, PostgresGroupStore};
pub use memory::MemoryGroupStore;
pub use postgres::{PostgresConfig, PostgresPool};
