//! Migration engine: discovery, gating, application, recording.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::MigrateResult;
use crate::executor::{self, ExecutionReport};
use crate::file::{MigrationFile, MigrationFileManager};
use crate::history::MigrationStore;

/// Progress notification emitted while a run is in flight.
///
/// Lets callers report per-unit progress (the operator CLI prints a
/// line per event) without re-implementing the run sequence.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// The unit is about to be executed.
    Applying(&'a str),
    /// The unit was already recorded and will not be re-executed.
    Skipping(&'a str),
    /// The unit finished; failed statements are in the report.
    Applied(&'a ExecutionReport),
}

/// Outcome of one migration unit within a run.
#[derive(Debug)]
pub enum UnitOutcome {
    /// The unit was executed and recorded.
    Applied(ExecutionReport),
    /// The unit was already recorded and was not re-executed.
    Skipped(String),
}

impl UnitOutcome {
    /// The unit's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Applied(report) => &report.name,
            Self::Skipped(name) => name,
        }
    }
}

/// Result of a full migration run, in application order.
#[derive(Debug, Default)]
pub struct MigrationRunResult {
    /// Per-unit outcomes in the order they were considered.
    pub outcomes: Vec<UnitOutcome>,
}

impl MigrationRunResult {
    /// Number of units executed in this run.
    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, UnitOutcome::Applied(_)))
            .count()
    }

    /// Number of units skipped as already applied.
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.applied_count()
    }

    /// Reports for the units executed in this run.
    pub fn reports(&self) -> impl Iterator<Item = &ExecutionReport> {
        self.outcomes.iter().filter_map(|o| match o {
            UnitOutcome::Applied(report) => Some(report),
            UnitOutcome::Skipped(_) => None,
        })
    }

    /// One-line summary of the run.
    pub fn summary(&self) -> String {
        let failed_statements: usize = self.reports().map(|r| r.failed_count()).sum();
        if failed_statements == 0 {
            format!(
                "{} applied, {} skipped",
                self.applied_count(),
                self.skipped_count()
            )
        } else {
            format!(
                "{} applied, {} skipped, {} failed statements",
                self.applied_count(),
                self.skipped_count(),
                failed_statements
            )
        }
    }
}

/// The migration engine.
///
/// Generic over the [`MigrationStore`] backend; one engine owns one
/// store (and therefore one connection) for one run.
pub struct MigrationEngine<S> {
    store: S,
    files: MigrationFileManager,
}

impl<S: MigrationStore> MigrationEngine<S> {
    /// Create an engine over a store and a migrations directory.
    pub fn new(store: S, migrations_dir: impl Into<PathBuf>) -> Self {
        let files = MigrationFileManager::new(migrations_dir);
        Self { store, files }
    }

    /// Ensure the tracking table exists. Idempotent.
    pub async fn initialize(&mut self) -> MigrateResult<()> {
        self.store.ensure_tracking_table().await
    }

    /// Discover migration units in application order.
    pub async fn discover(&self) -> MigrateResult<Vec<MigrationFile>> {
        self.files.list_migrations().await
    }

    /// Lenient applied-check.
    ///
    /// A failing lookup is logged and treated as "not applied" so a
    /// transient read issue does not block progress. The uniqueness
    /// constraint on the tracking table catches the case where the
    /// lookup was wrong.
    pub async fn is_applied(&mut self, name: &str) -> bool {
        match self.store.is_applied(name).await {
            Ok(applied) => applied,
            Err(e) => {
                warn!(
                    migration = %name,
                    error = %e,
                    "Applied-check failed; treating as not applied"
                );
                false
            }
        }
    }

    /// Apply a single unit and record it.
    pub async fn apply(&mut self, file: &MigrationFile) -> MigrateResult<ExecutionReport> {
        executor::apply(&mut self.store, file).await
    }

    /// Run all pending migrations under the cross-process lock.
    ///
    /// Units are considered in ascending name order, never skipped ahead
    /// of, never reordered. The lock is released on every exit path.
    pub async fn run(&mut self) -> MigrateResult<MigrationRunResult> {
        self.run_with(|_| {}).await
    }

    /// [`run`](Self::run) with a per-unit progress observer.
    pub async fn run_with<F>(&mut self, mut observe: F) -> MigrateResult<MigrationRunResult>
    where
        F: FnMut(RunEvent<'_>),
    {
        self.store.acquire_lock().await?;
        let result = self.run_locked(&mut observe).await;
        if let Err(e) = self.store.release_lock().await {
            warn!(error = %e, "Could not release migration lock");
        }
        result
    }

    async fn run_locked<F>(&mut self, observe: &mut F) -> MigrateResult<MigrationRunResult>
    where
        F: FnMut(RunEvent<'_>),
    {
        let mut result = MigrationRunResult::default();

        for file in self.discover().await? {
            if self.is_applied(&file.name).await {
                info!(migration = %file.name, "Skipping (already applied)");
                observe(RunEvent::Skipping(&file.name));
                result.outcomes.push(UnitOutcome::Skipped(file.name));
            } else {
                info!(migration = %file.name, "Applying");
                observe(RunEvent::Applying(&file.name));
                let report = self.apply(&file).await?;
                observe(RunEvent::Applied(&report));
                result.outcomes.push(UnitOutcome::Applied(report));
            }
        }

        Ok(result)
    }

    /// Access the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Take the store back, e.g. to reuse its connection for seeding.
    pub fn into_store(self) -> S {
        self.store
    }
}
