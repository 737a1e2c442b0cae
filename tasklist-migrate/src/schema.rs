//! Baseline schema assurance.
//!
//! Conditionally creates the core entity tables and patches the one
//! column that has evolved over the schema's life (`users.role`). Safe
//! to invoke on every process start; callers on the startup path treat
//! any error here as non-fatal and let request handlers surface their
//! own `db_unavailable` condition later.

use tracing::debug;

use crate::error::MigrateResult;
use crate::history::MigrationStore;

/// Core entity table: accounts.
pub const USERS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
  id INT AUTO_INCREMENT PRIMARY KEY,
  username VARCHAR(64) NOT NULL UNIQUE,
  email VARCHAR(255) UNIQUE,
  password_hash VARCHAR(255) NOT NULL,
  role ENUM('user','admin','customer') NOT NULL DEFAULT 'customer',
  created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Core entity table: tasks, cascade-deleted with their owner.
pub const TASKS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
  id INT AUTO_INCREMENT PRIMARY KEY,
  user_id INT NOT NULL,
  text VARCHAR(512) NOT NULL,
  completed TINYINT(1) NOT NULL DEFAULT 0,
  position INT DEFAULT 0,
  created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
  updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  INDEX idx_tasks_user (user_id),
  FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Core entity table: subtasks, cascade-deleted with their task.
pub const SUBTASKS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS subtasks (
  id INT AUTO_INCREMENT PRIMARY KEY,
  task_id INT NOT NULL,
  text VARCHAR(512) NOT NULL,
  completed TINYINT(1) NOT NULL DEFAULT 0,
  position INT DEFAULT 0,
  created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
  updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  INDEX idx_subtasks_task (task_id),
  FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Patch for schemas created before the role column existed. MySQL has
/// no `ADD COLUMN IF NOT EXISTS`, hence the INFORMATION_SCHEMA probe in
/// [`ensure_baseline_schema`].
pub const ROLE_COLUMN_ADD_SQL: &str = "ALTER TABLE users \
    ADD COLUMN role ENUM('user','admin','customer') NOT NULL DEFAULT 'customer' \
    AFTER password_hash";

/// Widens an existing role column so the enum includes every current
/// value.
pub const ROLE_COLUMN_WIDEN_SQL: &str = "ALTER TABLE users \
    MODIFY COLUMN role ENUM('user','admin','customer') NOT NULL DEFAULT 'customer'";

/// Idempotently ensure the baseline tables exist.
///
/// Issues conditional creation statements for `users`, `tasks`, and
/// `subtasks`, then runs the role-column patch. Never errors on repeated
/// invocation against an already-current schema.
pub async fn ensure_baseline_schema<S>(store: &mut S) -> MigrateResult<()>
where
    S: MigrationStore + ?Sized,
{
    store.execute(USERS_TABLE_SQL).await?;
    ensure_role_column(store).await?;
    store.execute(TASKS_TABLE_SQL).await?;
    store.execute(SUBTASKS_TABLE_SQL).await?;
    Ok(())
}

/// Ensure `users.role` exists and covers the current enum values.
async fn ensure_role_column<S>(store: &mut S) -> MigrateResult<()>
where
    S: MigrationStore + ?Sized,
{
    if !store.column_exists("users", "role").await? {
        store.execute(ROLE_COLUMN_ADD_SQL).await?;
        return Ok(());
    }

    // Widening an already-wide enum is a no-op on current servers but
    // can be rejected on older ones; that rejection is not actionable.
    if let Err(e) = store.execute(ROLE_COLUMN_WIDEN_SQL).await {
        debug!(error = %e, "Role column widen rejected; leaving column as is");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::MemoryStore;

    #[test]
    fn test_baseline_tables_are_conditional() {
        for sql in [USERS_TABLE_SQL, TASKS_TABLE_SQL, SUBTASKS_TABLE_SQL] {
            assert!(sql.contains("IF NOT EXISTS"));
            assert!(sql.contains("ENGINE=InnoDB"));
            assert!(sql.contains("utf8mb4"));
        }
    }

    #[test]
    fn test_cascade_delete_relationships() {
        assert!(TASKS_TABLE_SQL.contains("REFERENCES users(id) ON DELETE CASCADE"));
        assert!(SUBTASKS_TABLE_SQL.contains("REFERENCES tasks(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_uniqueness_constraints() {
        assert!(USERS_TABLE_SQL.contains("username VARCHAR(64) NOT NULL UNIQUE"));
        assert!(USERS_TABLE_SQL.contains("email VARCHAR(255) UNIQUE"));
    }

    #[tokio::test]
    async fn test_missing_role_column_is_added() {
        let mut store = MemoryStore::default();

        ensure_baseline_schema(&mut store).await.unwrap();

        assert!(store.executed.iter().any(|s| s.contains("ADD COLUMN role")));
        assert!(!store.executed.iter().any(|s| s.contains("MODIFY COLUMN role")));
    }

    #[tokio::test]
    async fn test_present_role_column_is_widened() {
        let mut store = MemoryStore::default();
        store.columns.insert("users.role".to_string());

        ensure_baseline_schema(&mut store).await.unwrap();

        assert!(store.executed.iter().any(|s| s.contains("MODIFY COLUMN role")));
        assert!(!store.executed.iter().any(|s| s.contains("ADD COLUMN role")));
    }

    #[tokio::test]
    async fn test_rejected_widen_is_swallowed() {
        let mut store = MemoryStore {
            fail_markers: vec!["MODIFY COLUMN role".to_string()],
            ..Default::default()
        };
        store.columns.insert("users.role".to_string());

        // The widen failure must not fail schema assurance.
        ensure_baseline_schema(&mut store).await.unwrap();
        assert!(store.executed.iter().any(|s| s.contains("subtasks")));
    }

    #[tokio::test]
    async fn test_repeated_invocation_is_safe() {
        let mut store = MemoryStore::default();
        ensure_baseline_schema(&mut store).await.unwrap();
        store.columns.insert("users.role".to_string());
        ensure_baseline_schema(&mut store).await.unwrap();
    }
}
