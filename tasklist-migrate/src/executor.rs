//! Migration execution with per-statement failure isolation.

use tracing::warn;

use crate::error::MigrateResult;
use crate::file::MigrationFile;
use crate::history::MigrationStore;

/// Maximum statement length echoed into logs and reports.
const PREVIEW_LEN: usize = 80;

/// Outcome of one statement inside a migration unit.
#[derive(Debug, Clone)]
pub struct StatementOutcome {
    /// The statement as executed (trimmed).
    pub statement: String,
    /// The error message, if the statement failed.
    pub error: Option<String>,
}

impl StatementOutcome {
    /// Whether the statement executed cleanly.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Truncated statement text for operator-facing output.
    pub fn preview(&self) -> String {
        preview(&self.statement)
    }
}

/// Report for one applied migration unit.
///
/// A unit with failed statements is still recorded as applied (see
/// [`apply`]); the report is how the caller finds out.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Migration name.
    pub name: String,
    /// Per-statement outcomes, in execution order.
    pub outcomes: Vec<StatementOutcome>,
}

impl ExecutionReport {
    /// Create an empty report for the named unit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Vec::new(),
        }
    }

    /// Number of statements that executed cleanly.
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Number of statements that failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    /// Whether every statement executed cleanly.
    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0
    }

    /// The failed outcomes, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// One-line summary of the report.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("{}: {} statements", self.name, self.outcomes.len())
        } else {
            format!(
                "{}: {} statements, {} FAILED",
                self.name,
                self.outcomes.len(),
                self.failed_count()
            )
        }
    }
}

/// Split raw migration text into statements.
///
/// The split is purely textual: statements are separated by `;`,
/// whitespace is trimmed, and blank statements are discarded. Comments
/// and string literals containing `;` are not treated specially.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Apply a single migration unit.
///
/// Executes each statement sequentially. A failing statement is logged
/// with the unit name, a truncated preview, and the error, then
/// execution proceeds to the next statement — the unit is not aborted.
/// After all statements have been attempted, the unit is unconditionally
/// recorded as applied; a duplicate record surfaces as a constraint
/// violation from the store.
pub async fn apply<S>(store: &mut S, file: &MigrationFile) -> MigrateResult<ExecutionReport>
where
    S: MigrationStore + ?Sized,
{
    let mut report = ExecutionReport::new(&file.name);

    for statement in split_statements(&file.sql) {
        let error = match store.execute(&statement).await {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    migration = %file.name,
                    statement = %preview(&statement),
                    error = %e,
                    "Statement failed; continuing with the rest of the unit"
                );
                Some(e.to_string())
            }
        };
        report.outcomes.push(StatementOutcome { statement, error });
    }

    store.record(&file.name).await?;
    Ok(report)
}

fn preview(statement: &str) -> String {
    if statement.len() <= PREVIEW_LEN {
        statement.to_string()
    } else {
        let cut = statement
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= PREVIEW_LEN)
            .last()
            .unwrap_or(0);
        format!("{}…", &statement[..cut])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_statements() {
        let sql = "CREATE TABLE a (id INT);\n\nINSERT INTO a VALUES (1);\n;\n  ";
        assert_eq!(
            split_statements(sql),
            vec![
                "CREATE TABLE a (id INT)".to_string(),
                "INSERT INTO a VALUES (1)".to_string(),
            ]
        );
    }

    #[test]
    fn test_split_statements_empty_input() {
        assert!(split_statements("").is_empty());
        assert!(split_statements(" ;\n; ;").is_empty());
    }

    #[test]
    fn test_split_is_purely_textual() {
        // A semicolon inside a string literal still splits; documented
        // limitation of the migration file format.
        let stmts = split_statements("INSERT INTO a VALUES ('x;y')");
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn test_preview_truncates_long_statements() {
        let long = "SELECT ".to_string() + &"c, ".repeat(60);
        let outcome = StatementOutcome {
            statement: long.clone(),
            error: None,
        };
        assert!(outcome.preview().len() < long.len());
        assert!(outcome.preview().ends_with('…'));
    }

    #[test]
    fn test_report_counters() {
        let mut report = ExecutionReport::new("0001_init.sql");
        report.outcomes.push(StatementOutcome {
            statement: "CREATE TABLE a (id INT)".into(),
            error: None,
        });
        report.outcomes.push(StatementOutcome {
            statement: "CREATE TABLE a (id INT)".into(),
            error: Some("table exists".into()),
        });

        assert_eq!(report.succeeded_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_clean());
        assert!(report.summary().contains("FAILED"));
        assert_eq!(report.failures().count(), 1);
    }
}
