//! Error types for the storage layer.
//!
//! All failures propagate as [`DbError`]. At the dispatch boundary these
//! are infrastructure errors: logged and swallowed, never surfaced as a
//! failed webhook acknowledgment.

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The in-memory store's lock was poisoned by a panicking test.
    #[error("memory store lock poisoned")]
    LockPoisoned,
}
