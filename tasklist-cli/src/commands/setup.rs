//! `tasklist setup` - baseline schema assurance.
//!
//! The same best-effort path a service runs at startup: ensure the core
//! tables exist, and never fail the caller over it. A broken database
//! surfaces later, from whatever actually needs it.

use tracing::warn;

use tasklist_migrate::{MysqlMigrationStore, schema};
use tasklist_mysql::provision;

use crate::cli::SetupArgs;
use crate::commands::resolve_config;
use crate::error::CliResult;
use crate::output;

/// Run the setup command
pub async fn run(args: SetupArgs) -> CliResult<()> {
    output::header("Setup");

    let config = resolve_config(&args.connection)?;
    let conn = match provision::acquire(&config, true).await {
        Ok(conn) => conn,
        Err(e) => {
            output::warn("Schema assurance skipped: no database connection.");
            output::kv("Cause", &e.to_string());
            return Ok(());
        }
    };

    let mut store = MysqlMigrationStore::new(conn);
    match schema::ensure_baseline_schema(&mut store).await {
        Ok(()) => output::success("Baseline schema present."),
        Err(e) => output::warn(&format!("Schema assurance failed: {}", e)),
    }

    if let Err(e) = store.into_connection().disconnect().await {
        warn!(error = %e, "Could not cleanly close the connection");
    }

    Ok(())
}
