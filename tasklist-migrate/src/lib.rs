//! # tasklist-migrate
//!
//! Schema migration and bootstrap engine for the tasklist database.
//!
//! This crate provides:
//! - Migration file discovery in lexical (and therefore chronological)
//!   order
//! - Applied-migration tracking in a `schema_migrations` table
//! - Statement-by-statement execution with per-statement failure
//!   isolation
//! - Baseline schema assurance (`users`, `tasks`, `subtasks`) safe to run
//!   on every process start
//! - Administrative account seeding with a salted PBKDF2 credential
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────────┐
//! │ migrations/  │────▶│ MigrationFile │────▶│ MigrationEngine  │
//! │  *.sql       │     │ Manager       │     │  (is_applied →   │
//! └──────────────┘     └───────────────┘     │   apply → record)│
//!                                            └────────┬─────────┘
//!                                                     ▼
//!                                            ┌──────────────────┐
//!                                            │ MigrationStore   │
//!                                            │ (MySQL backend)  │
//!                                            └──────────────────┘
//! ```
//!
//! Every database operation goes through the [`MigrationStore`] trait so
//! the engine's exactly-once semantics can be exercised without a live
//! server; [`MysqlMigrationStore`] is the production backend.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tasklist_migrate::{MigrationEngine, MysqlMigrationStore, seed};
//! use tasklist_mysql::{MysqlConfig, provision};
//!
//! async fn migrate() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MysqlConfig::from_env()?;
//!     let conn = provision::acquire(&config, true).await?;
//!
//!     let store = MysqlMigrationStore::new(conn);
//!     let mut engine = MigrationEngine::new(store, "./migrations");
//!     engine.initialize().await?;
//!     let result = engine.run().await?;
//!     println!("{}", result.summary());
//!
//!     let mut store = engine.into_store();
//!     seed::ensure_admin(&mut store, seed::admin_password_from_env()).await?;
//!     store.into_connection().disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod credential;
pub mod engine;
pub mod error;
pub mod executor;
pub mod file;
pub mod history;
pub mod schema;
pub mod seed;
pub mod store;

pub use engine::{MigrationEngine, MigrationRunResult, RunEvent, UnitOutcome};
pub use error::{MigrateResult, MigrationError};
pub use executor::{ExecutionReport, StatementOutcome};
pub use file::{MigrationFile, MigrationFileManager};
pub use history::{MigrationRecord, MigrationStore};
pub use seed::SeedOutcome;
pub use store::MysqlMigrationStore;
