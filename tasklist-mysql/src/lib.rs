//! MySQL connection layer for the tasklist migration engine.
//!
//! This crate owns everything between the process and the MySQL server:
//! environment/URL-sourced configuration, a thin typed wrapper over
//! `mysql_async::Conn`, and the provisioning path that creates the target
//! database on first contact.
//!
//! Connections here are deliberately scoped, not pooled: the migration run
//! acquires one connection for its whole duration and releases it at the
//! end, and the provisioning path opens a short-lived server-level
//! connection only when the target database does not exist yet.
//!
//! # Example
//!
//! ```rust,ignore
//! use tasklist_mysql::{MysqlConfig, provision};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MysqlConfig::from_env()?;
//!     let conn = provision::acquire(&config, true).await?;
//!     // use the connection, then release it explicitly
//!     conn.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod provision;

pub use config::MysqlConfig;
pub use connection::MysqlConnection;
pub use error::{MysqlError, MysqlResult};
