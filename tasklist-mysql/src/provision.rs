//! Connection provisioning.
//!
//! Opens a connection to the configured database, transparently creating
//! the database itself on first contact when asked to. There is exactly
//! one retry path: create the database through a short-lived server-level
//! connection, then reconnect directly. Anything that still fails after
//! that surfaces as [`MysqlError::Connection`] and is fatal to the
//! caller.

use mysql_async::prelude::*;
use mysql_async::{Conn, Opts};
use tracing::{debug, info};

use crate::config::MysqlConfig;
use crate::connection::MysqlConnection;
use crate::error::{MysqlError, MysqlResult};

/// Character set and collation applied when the target database has to
/// be created.
pub const DATABASE_CHARSET: &str = "utf8mb4";
pub const DATABASE_COLLATION: &str = "utf8mb4_unicode_ci";

/// Acquire a connection to the configured database.
///
/// Attempts a direct connect first. If that fails and `create_if_missing`
/// is set, connects to the server without selecting a database, issues a
/// conditional `CREATE DATABASE`, closes that connection, and retries
/// the direct connect once.
pub async fn acquire(config: &MysqlConfig, create_if_missing: bool) -> MysqlResult<MysqlConnection> {
    match Conn::new(Opts::from(config.to_opts_builder())).await {
        Ok(conn) => {
            debug!(
                host = %config.host,
                port = %config.port,
                database = %config.database,
                "Connected"
            );
            Ok(MysqlConnection::new(conn))
        }
        Err(e) if create_if_missing => {
            debug!(error = %e, database = %config.database, "Direct connect failed");
            create_database(config).await?;
            let conn = Conn::new(Opts::from(config.to_opts_builder()))
                .await
                .map_err(|e| {
                    MysqlError::connection(format!(
                        "could not connect to '{}' after creating it: {}",
                        config.database, e
                    ))
                })?;
            Ok(MysqlConnection::new(conn))
        }
        Err(e) => Err(MysqlError::connection(format!(
            "could not connect to '{}': {}",
            config.database, e
        ))),
    }
}

/// Create the configured database through a server-level connection.
async fn create_database(config: &MysqlConfig) -> MysqlResult<()> {
    let mut server = Conn::new(Opts::from(config.server_opts_builder()))
        .await
        .map_err(|e| {
            MysqlError::connection(format!(
                "server {}:{} unreachable: {}",
                config.host, config.port, e
            ))
        })?;

    server
        .query_drop(create_database_sql(&config.database))
        .await
        .map_err(|e| {
            MysqlError::connection(format!(
                "could not create database '{}': {}",
                config.database, e
            ))
        })?;
    server.disconnect().await?;

    info!(database = %config.database, "Created database");
    Ok(())
}

/// The conditional create-database statement for the given name.
pub fn create_database_sql(database: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS `{}` CHARACTER SET {} COLLATE {}",
        database, DATABASE_CHARSET, DATABASE_COLLATION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_database_sql() {
        let sql = create_database_sql("todolist");
        assert!(sql.starts_with("CREATE DATABASE IF NOT EXISTS `todolist`"));
        assert!(sql.contains("utf8mb4"));
        assert!(sql.contains("utf8mb4_unicode_ci"));
    }

    #[tokio::test]
    async fn test_acquire_unreachable_server_is_fatal() {
        // Port 1 on localhost is never a MySQL server.
        let config = MysqlConfig::new("nope").host("127.0.0.1").port(1);
        let err = acquire(&config, false).await.unwrap_err();
        assert!(matches!(err, MysqlError::Connection(_)));
    }

    #[tokio::test]
    async fn test_acquire_unreachable_server_with_create() {
        // The create path must also end in a Connection error, not a panic.
        let config = MysqlConfig::new("nope").host("127.0.0.1").port(1);
        let err = acquire(&config, true).await.unwrap_err();
        assert!(matches!(err, MysqlError::Connection(_)));
    }
}
