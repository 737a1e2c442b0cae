//! MySQL backend for the migration store.

use chrono::NaiveDateTime;
use tasklist_mysql::MysqlConnection;
use tracing::debug;

use crate::error::{MigrateResult, MigrationError};
use crate::history::{LOCK_SQL, MIGRATION_LOCK_NAME, MigrationRecord, MigrationStore, TRACKING_TABLE_SQL, UNLOCK_SQL};

/// MySQL duplicate-key server error code.
const ER_DUP_ENTRY: u16 = 1062;

/// [`MigrationStore`] implementation over a single MySQL connection.
///
/// Owns the connection for the duration of the run; call
/// [`into_connection`](Self::into_connection) to take it back for scoped
/// release.
pub struct MysqlMigrationStore {
    conn: MysqlConnection,
}

impl MysqlMigrationStore {
    /// Create a store over an acquired connection.
    pub fn new(conn: MysqlConnection) -> Self {
        Self { conn }
    }

    /// Take the underlying connection back.
    pub fn into_connection(self) -> MysqlConnection {
        self.conn
    }
}

#[async_trait::async_trait]
impl MigrationStore for MysqlMigrationStore {
    async fn execute(&mut self, statement: &str) -> MigrateResult<()> {
        self.conn.execute(statement).await?;
        Ok(())
    }

    async fn ensure_tracking_table(&mut self) -> MigrateResult<()> {
        self.conn.execute(TRACKING_TABLE_SQL).await?;
        Ok(())
    }

    async fn is_applied(&mut self, name: &str) -> MigrateResult<bool> {
        let row: Option<(i64,)> = self
            .conn
            .query_first_params("SELECT 1 FROM schema_migrations WHERE name = ?", (name,))
            .await?;
        Ok(row.is_some())
    }

    async fn record(&mut self, name: &str) -> MigrateResult<()> {
        let result = self
            .conn
            .execute_params("INSERT INTO schema_migrations (name) VALUES (?)", (name,))
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.server_code() == Some(ER_DUP_ENTRY) => Err(MigrationError::constraint(
                format!("migration '{}' is already recorded", name),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn applied(&mut self) -> MigrateResult<Vec<MigrationRecord>> {
        let rows: Vec<(u64, String, String)> = self
            .conn
            .query_params(
                "SELECT id, name, CAST(applied_at AS CHAR) FROM schema_migrations ORDER BY name",
                (),
            )
            .await?;

        rows.into_iter()
            .map(|(id, name, applied_at)| {
                let applied_at = NaiveDateTime::parse_from_str(&applied_at, "%Y-%m-%d %H:%M:%S%.f")
                    .map_err(|e| {
                        MigrationError::database(format!(
                            "unparseable applied_at '{}' for '{}': {}",
                            applied_at, name, e
                        ))
                    })?
                    .and_utc();
                Ok(MigrationRecord {
                    id,
                    name,
                    applied_at,
                })
            })
            .collect()
    }

    async fn acquire_lock(&mut self) -> MigrateResult<()> {
        // GET_LOCK returns 1 on success, 0 on timeout, NULL on error.
        let row: Option<(Option<i64>,)> = self.conn.query_first_params(LOCK_SQL, ()).await?;
        match row {
            Some((Some(1),)) => {
                debug!(lock = MIGRATION_LOCK_NAME, "Acquired migration lock");
                Ok(())
            }
            _ => Err(MigrationError::lock(format!(
                "'{}' is held by another migration run",
                MIGRATION_LOCK_NAME
            ))),
        }
    }

    async fn release_lock(&mut self) -> MigrateResult<()> {
        let _: Option<(Option<i64>,)> = self.conn.query_first_params(UNLOCK_SQL, ()).await?;
        debug!(lock = MIGRATION_LOCK_NAME, "Released migration lock");
        Ok(())
    }

    async fn column_exists(&mut self, table: &str, column: &str) -> MigrateResult<bool> {
        let count: Option<i64> = self
            .conn
            .query_scalar_params(
                "SELECT COUNT(*) FROM INFORMATION_SCHEMA.COLUMNS \
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = ?",
                (table, column),
            )
            .await?;
        Ok(count.unwrap_or(0) > 0)
    }

    async fn user_exists(&mut self, username: &str) -> MigrateResult<bool> {
        let row: Option<(u64,)> = self
            .conn
            .query_first_params("SELECT id FROM users WHERE username = ?", (username,))
            .await?;
        Ok(row.is_some())
    }

    async fn insert_user(
        &mut self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Option<&str>,
    ) -> MigrateResult<()> {
        let result = match role {
            Some(role) => {
                self.conn
                    .execute_params(
                        "INSERT INTO users (username, email, password_hash, role) \
                         VALUES (?, ?, ?, ?)",
                        (username, email, password_hash, role),
                    )
                    .await
            }
            None => {
                self.conn
                    .execute_params(
                        "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?)",
                        (username, email, password_hash),
                    )
                    .await
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.server_code() == Some(ER_DUP_ENTRY) => Err(MigrationError::constraint(
                format!("user '{}' already exists", username),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
