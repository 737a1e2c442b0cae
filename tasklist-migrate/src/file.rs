//! Migration file discovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateResult, MigrationError};

/// A migration unit read from disk.
///
/// The unit's name is its filename; files must be named so that lexical
/// order equals intended chronological order (zero-padded numeric
/// prefixes like `0001_` do this).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationFile {
    /// Path to the migration file.
    pub path: PathBuf,
    /// Migration name (the filename, unique within the directory).
    pub name: String,
    /// Raw SQL content.
    pub sql: String,
}

/// Migration file reader.
pub struct MigrationFileManager {
    /// Directory where migrations are stored.
    migrations_dir: PathBuf,
}

impl MigrationFileManager {
    /// Create a new file manager.
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
        }
    }

    /// Get the migrations directory.
    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// List all migration files in application order.
    ///
    /// Lists `*.sql` files in the directory and sorts them by filename
    /// ascending. A missing directory yields an empty sequence. Pure
    /// read of the filesystem at call time; restartable.
    pub async fn list_migrations(&self) -> MigrateResult<Vec<MigrationFile>> {
        let mut migrations = Vec::new();

        if !self.migrations_dir.exists() {
            return Ok(migrations);
        }

        let mut entries = tokio::fs::read_dir(&self.migrations_dir)
            .await
            .map_err(MigrationError::Io)?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(MigrationError::Io)? {
            let path = entry.path();
            if is_migration_file(&path) {
                paths.push(path);
            }
        }

        // Directory listing order is not deterministic; the filename is
        // the ordering key.
        paths.sort();

        for path in paths {
            migrations.push(self.read_migration(&path).await?);
        }

        Ok(migrations)
    }

    /// Read a single migration file.
    async fn read_migration(&self, path: &Path) -> MigrateResult<MigrationFile> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MigrationError::invalid(format!("unreadable filename: {}", path.display())))?
            .to_string();

        let sql = tokio::fs::read_to_string(path)
            .await
            .map_err(MigrationError::Io)?;

        Ok(MigrationFile {
            path: path.to_path_buf(),
            name,
            sql,
        })
    }
}

/// Check if a path looks like a migration file.
fn is_migration_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
}
