//! `tasklist migrate` - the operator migration run.
//!
//! Ensures the tracking table, applies every pending unit in name order,
//! and ensures the administrative account. Only a failed connection
//! aborts the run, and even that exits cleanly with an explanatory
//! message; individual statement failures are printed and the run keeps
//! going.

use tracing::warn;

use tasklist_migrate::{MigrationEngine, MysqlMigrationStore, RunEvent, seed};
use tasklist_mysql::provision;

use crate::cli::MigrateArgs;
use crate::commands::resolve_config;
use crate::error::CliResult;
use crate::output;

/// Run the migrate command
pub async fn run(args: MigrateArgs) -> CliResult<()> {
    output::header("Migrate");

    let config = resolve_config(&args.connection)?;
    output::kv(
        "Database",
        &format!("{}:{}/{}", config.host, config.port, config.database),
    );
    output::kv("Migrations", &args.migrations_dir.display().to_string());
    output::newline();

    let conn = match provision::acquire(&config, true).await {
        Ok(conn) => conn,
        Err(e) => {
            // Fatal, but not a crash: the operator gets told what to fix.
            output::warn("Database connection failed. Check the MYSQL_* environment variables and that the server is reachable.");
            output::kv("Cause", &e.to_string());
            return Ok(());
        }
    };

    let store = MysqlMigrationStore::new(conn);
    let mut engine = MigrationEngine::new(store, &args.migrations_dir);

    let outcome = drive(&mut engine).await;

    // Scoped release on every exit path.
    if let Err(e) = engine.into_store().into_connection().disconnect().await {
        warn!(error = %e, "Could not cleanly close the connection");
    }

    outcome
}

async fn drive(engine: &mut MigrationEngine<MysqlMigrationStore>) -> CliResult<()> {
    engine.initialize().await?;

    engine.run_with(report_progress).await?;

    println!("Migrations complete.");

    match seed::ensure_admin(engine.store_mut(), seed::admin_password_from_env()).await {
        Ok(seed::SeedOutcome::Created) => {
            output::success(&format!(
                "Admin user created: username={} (set {} to override the default password)",
                seed::ADMIN_USERNAME,
                seed::ENV_ADMIN_PASSWORD
            ));
        }
        Ok(seed::SeedOutcome::CreatedWithoutRole) => {
            output::success(&format!(
                "Admin user created: username={} (schema has no role column; created without one)",
                seed::ADMIN_USERNAME
            ));
        }
        Ok(seed::SeedOutcome::AlreadyExists) => {
            output::info("Admin user already present.");
        }
        Err(e) => {
            // Non-fatal: the run still completed.
            output::warn(&format!("Failed to ensure admin user: {}", e));
        }
    }

    Ok(())
}

fn report_progress(event: RunEvent<'_>) {
    match event {
        RunEvent::Skipping(name) => println!("Skipping {} (already applied)", name),
        RunEvent::Applying(name) => println!("Applying {}…", name),
        RunEvent::Applied(report) => {
            for failure in report.failures() {
                output::warn(&format!(
                    "Failed statement in {}: {} ({})",
                    report.name,
                    failure.preview(),
                    failure.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }
    }
}
