use thiserror::Error;

/// Errors raised by the plan store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No database URL was configured.
    #[error("No database configured")]
    NotConfigured,

    /// The connection pool could not be created.
    #[error("Failed to open database pool: {0}")]
    Connection(String),

    /// The insert statement failed.
    #[error("Failed to insert plan: {0}")]
    Insert(String),
}
