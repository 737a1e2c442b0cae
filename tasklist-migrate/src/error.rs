//! Error types for the migration engine.

use tasklist_mysql::MysqlError;
use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrationError>;

/// Errors that can occur during migration operations.
///
/// The variants encode the propagation policy: [`Connection`] aborts the
/// run, [`Database`] is recoverable at the statement level, and
/// [`Constraint`] marks a data-integrity violation that must surface
/// loudly rather than be retried.
///
/// [`Connection`]: MigrationError::Connection
/// [`Database`]: MigrationError::Database
/// [`Constraint`]: MigrationError::Constraint
#[derive(Debug, Error)]
pub enum MigrationError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database connection could not be established or was lost.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A uniqueness constraint was violated.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The migration lock is held by another process.
    #[error("Migration lock unavailable: {0}")]
    Lock(String),

    /// Invalid migration file or format.
    #[error("Invalid migration: {0}")]
    InvalidMigration(String),
}

impl MigrationError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a constraint violation error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a lock error.
    pub fn lock(msg: impl Into<String>) -> Self {
        Self::Lock(msg.into())
    }

    /// Create an invalid migration error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidMigration(msg.into())
    }

    /// Whether this error aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Whether callers may log this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Io(_))
    }
}

impl From<MysqlError> for MigrationError {
    fn from(err: MysqlError) -> Self {
        match err {
            MysqlError::Connection(msg) => Self::Connection(msg),
            MysqlError::Config(msg) => Self::Connection(format!("configuration: {}", msg)),
            other => Self::Database(other.to_string()),
        }
    }
}
