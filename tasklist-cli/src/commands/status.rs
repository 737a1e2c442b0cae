//! `tasklist status` - show applied/pending state per migration.

use std::collections::BTreeSet;

use tracing::warn;

use tasklist_migrate::{MigrationFileManager, MigrationStore, MysqlMigrationStore};
use tasklist_mysql::provision;

use crate::cli::StatusArgs;
use crate::commands::resolve_config;
use crate::error::CliResult;
use crate::output;

/// Run the status command
pub async fn run(args: StatusArgs) -> CliResult<()> {
    output::header("Migration Status");

    let config = resolve_config(&args.connection)?;
    let conn = match provision::acquire(&config, false).await {
        Ok(conn) => conn,
        Err(e) => {
            output::warn("Database connection failed; nothing to report.");
            output::kv("Cause", &e.to_string());
            return Ok(());
        }
    };

    let mut store = MysqlMigrationStore::new(conn);
    let outcome = report(&mut store, &args).await;

    if let Err(e) = store.into_connection().disconnect().await {
        warn!(error = %e, "Could not cleanly close the connection");
    }

    outcome
}

async fn report(store: &mut MysqlMigrationStore, args: &StatusArgs) -> CliResult<()> {
    store.ensure_tracking_table().await?;

    let applied: BTreeSet<String> = store
        .applied()
        .await?
        .into_iter()
        .map(|record| record.name)
        .collect();

    let files = MigrationFileManager::new(&args.migrations_dir)
        .list_migrations()
        .await?;

    if files.is_empty() {
        output::info(&format!(
            "No migration files found in {}.",
            args.migrations_dir.display()
        ));
        return Ok(());
    }

    for (i, file) in files.iter().enumerate() {
        let status = if applied.contains(&file.name) {
            output::style_success("✓ Applied")
        } else {
            output::style_pending("○ Pending")
        };
        output::numbered_item(i + 1, &format!("{} - {}", file.name, status));
    }

    let applied_count = files.iter().filter(|f| applied.contains(&f.name)).count();

    output::newline();
    output::kv("Total", &files.len().to_string());
    output::kv("Applied", &applied_count.to_string());
    output::kv("Pending", &(files.len() - applied_count).to_string());

    Ok(())
}
