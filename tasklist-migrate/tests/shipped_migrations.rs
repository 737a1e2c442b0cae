//! Integration tests for the migration units shipped with the workspace.

use tasklist_migrate::MigrationFileManager;

fn shipped_dir() -> String {
    format!("{}/../migrations", env!("CARGO_MANIFEST_DIR"))
}

#[tokio::test]
async fn test_shipped_units_apply_in_order() {
    let manager = MigrationFileManager::new(shipped_dir());
    let migrations = manager.list_migrations().await.unwrap();

    let names: Vec<_> = migrations.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "0001_user_profile_fields.sql",
            "0002_task_details.sql",
            "0003_task_scheduling.sql",
            "0004_task_due_index.sql",
        ]
    );
}

#[tokio::test]
async fn test_shipped_units_cover_task_columns() {
    let manager = MigrationFileManager::new(shipped_dir());
    let migrations = manager.list_migrations().await.unwrap();
    let all_sql: String = migrations.iter().map(|m| m.sql.as_str()).collect();

    // Every tasks column the application handlers touch must come from
    // either the baseline DDL or a shipped unit.
    for column in [
        "description",
        "category",
        "priority",
        "assigned_to",
        "due_date",
        "remind",
    ] {
        assert!(
            all_sql.contains(column),
            "no shipped unit adds tasks.{}",
            column
        );
    }
}

#[tokio::test]
async fn test_due_index_ships_after_its_column() {
    let manager = MigrationFileManager::new(shipped_dir());
    let migrations = manager.list_migrations().await.unwrap();

    let adds_column = migrations
        .iter()
        .position(|m| m.sql.contains("ADD COLUMN due_date"))
        .unwrap();
    let adds_index = migrations
        .iter()
        .position(|m| m.sql.contains("idx_tasks_due"))
        .unwrap();
    assert!(adds_column < adds_index);
}
