//! Migration history tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MigrateResult;

/// A record of an applied migration.
///
/// The full set of records is the authoritative schema state: records
/// are created once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Auto-incrementing identity.
    pub id: u64,
    /// Migration name (unique).
    pub name: String,
    /// When the migration was recorded as applied.
    pub applied_at: DateTime<Utc>,
}

/// Storage backend for the migration engine.
///
/// All database operations the engine, schema registry, and seeder need
/// go through this trait, so the exactly-once semantics can be tested
/// against an in-memory double. The production backend is
/// [`MysqlMigrationStore`](crate::store::MysqlMigrationStore).
#[async_trait::async_trait]
pub trait MigrationStore: Send {
    /// Execute a raw SQL statement.
    async fn execute(&mut self, statement: &str) -> MigrateResult<()>;

    /// Conditionally create the tracking table. Idempotent.
    async fn ensure_tracking_table(&mut self) -> MigrateResult<()>;

    /// Check whether a migration name has been recorded as applied.
    async fn is_applied(&mut self, name: &str) -> MigrateResult<bool>;

    /// Record a migration as applied.
    ///
    /// Inserts exactly one row; the uniqueness constraint on the name is
    /// the last line of defense and surfaces as
    /// [`MigrationError::Constraint`](crate::MigrationError::Constraint)
    /// if the same name is recorded twice.
    async fn record(&mut self, name: &str) -> MigrateResult<()>;

    /// All recorded migrations, ordered by name.
    async fn applied(&mut self) -> MigrateResult<Vec<MigrationRecord>>;

    /// Take the cross-process migration lock without waiting.
    async fn acquire_lock(&mut self) -> MigrateResult<()>;

    /// Release the cross-process migration lock.
    async fn release_lock(&mut self) -> MigrateResult<()>;

    /// Check whether a column exists on a table in the current database.
    async fn column_exists(&mut self, table: &str, column: &str) -> MigrateResult<bool>;

    /// Look up a user by username.
    async fn user_exists(&mut self, username: &str) -> MigrateResult<bool>;

    /// Insert a user row; `role` is omitted from the statement when
    /// `None` (older schemas without the role column or enum value).
    async fn insert_user(
        &mut self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Option<&str>,
    ) -> MigrateResult<()>;
}

/// SQL for creating the tracking table.
pub const TRACKING_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
  id INT AUTO_INCREMENT PRIMARY KEY,
  name VARCHAR(255) NOT NULL UNIQUE,
  applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Advisory lock around the migration run. `GET_LOCK` with a zero
/// timeout fails fast instead of queueing behind another operator.
pub const MIGRATION_LOCK_NAME: &str = "tasklist.migrations";
pub const LOCK_SQL: &str = "SELECT GET_LOCK('tasklist.migrations', 0)";
pub const UNLOCK_SQL: &str = "SELECT RELEASE_LOCK('tasklist.migrations')";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_table_sql_shape() {
        assert!(TRACKING_TABLE_SQL.contains("IF NOT EXISTS"));
        assert!(TRACKING_TABLE_SQL.contains("schema_migrations"));
        assert!(TRACKING_TABLE_SQL.contains("NOT NULL UNIQUE"));
        assert!(TRACKING_TABLE_SQL.contains("DEFAULT CURRENT_TIMESTAMP"));
    }

    #[test]
    fn test_lock_sql_uses_named_lock() {
        assert!(LOCK_SQL.contains(MIGRATION_LOCK_NAME));
        assert!(UNLOCK_SQL.contains(MIGRATION_LOCK_NAME));
    }

    #[test]
    fn test_migration_record() {
        let record = MigrationRecord {
            id: 1,
            name: "0001_users.sql".to_string(),
            applied_at: Utc::now(),
        };
        assert_eq!(record.name, "0001_users.sql");
    }
}
