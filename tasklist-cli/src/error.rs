//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

use tasklist_migrate::MigrationError;
use tasklist_mysql::MysqlError;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(tasklist::io))]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    #[diagnostic(code(tasklist::database))]
    Database(String),

    /// Migration error
    #[error("Migration error: {0}")]
    #[diagnostic(code(tasklist::migration))]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(tasklist::config))]
    Config(String),
}

impl From<MysqlError> for CliError {
    fn from(err: MysqlError) -> Self {
        match err {
            MysqlError::Config(msg) => CliError::Config(msg),
            other => CliError::Database(other.to_string()),
        }
    }
}

impl From<MigrationError> for CliError {
    fn from(err: MigrationError) -> Self {
        CliError::Migration(err.to_string())
    }
}
