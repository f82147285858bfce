//! Commit emissions job: probe every target in a change-set, log the result.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::domain::models::{
    round_grams, ChangeSet, EmissionValue, EmissionsResult, LogEntry,
};
use crate::domain::ports::OptimizationWorkflow;
use crate::services::emissions_log::EmissionsLog;
use crate::services::probe::EmissionsProbe;

/// Processes one push event's change-set into an emissions result and a
/// durable log entry.
pub struct CommitEmissionsJob {
    probe: Arc<EmissionsProbe>,
    log: Arc<EmissionsLog>,
    workflow: Arc<dyn OptimizationWorkflow>,
}

impl CommitEmissionsJob {
    pub fn new(
        probe: Arc<EmissionsProbe>,
        log: Arc<EmissionsLog>,
        workflow: Arc<dyn OptimizationWorkflow>,
    ) -> Self {
        Self { probe, log, workflow }
    }

    /// Measure every qualifying target and append one log entry.
    ///
    /// Per-target failures are recorded as strings inside the result and
    /// never abort the batch. The log entry is appended unconditionally,
    /// including when no target qualified.
    #[instrument(skip(self, changeset))]
    pub async fn run(
        &self,
        repo_folder: &Path,
        changeset: &ChangeSet,
        repo_name: &str,
    ) -> Result<EmissionsResult> {
        let targets = changeset.select_targets(repo_folder);
        info!(repo_name, targets = targets.len(), "processing commit emissions");

        let mut emissions = EmissionsResult::new();
        for (rel_path, abs_path) in targets {
            match self.probe.measure(&abs_path).await {
                Ok(grams) => {
                    info!(target = %rel_path, grams, "emissions measured");
                    emissions.insert(rel_path, EmissionValue::Grams(round_grams(grams)));
                }
                Err(e) => {
                    warn!(target = %rel_path, error = %e, "emissions measurement failed");
                    let message =
                        format!("Error calculating emissions for {rel_path}: {e}");
                    emissions.insert(rel_path, EmissionValue::Error(message));
                }
            }
        }

        let entry = LogEntry::new(repo_name, emissions.clone());
        self.log
            .append(entry)
            .await
            .context("failed to append emissions log entry")?;

        if let Err(e) = self.workflow.notify(repo_name, &emissions).await {
            warn!(repo_name, error = %e, "optimization workflow notification failed");
        }

        Ok(emissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::domain::errors::{MeasurementError, MeasurementResult};
    use crate::domain::ports::{
        ExecutionReport, NullWorkflow, StaticInstrument, TestExecutor,
    };

    struct RecordingExecutor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TestExecutor for RecordingExecutor {
        async fn execute(&self, _test_file: &Path) -> MeasurementResult<ExecutionReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExecutionReport {
                success: true,
                exit_code: Some(0),
                stderr: String::new(),
            })
        }
    }

    fn job_with(
        reading_kg: Option<f64>,
        log: Arc<EmissionsLog>,
    ) -> (CommitEmissionsJob, Arc<RecordingExecutor>) {
        let executor = Arc::new(RecordingExecutor {
            calls: AtomicUsize::new(0),
        });
        let probe = Arc::new(EmissionsProbe::new(
            Arc::new(StaticInstrument::new(reading_kg)),
            executor.clone(),
        ));
        (
            CommitEmissionsJob::new(probe, log, Arc::new(NullWorkflow)),
            executor,
        )
    }

    #[tokio::test]
    async fn measures_selected_targets_and_logs_entry() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(EmissionsLog::new(dir.path().join("emissions_log.json")));
        let (job, _) = job_with(Some(0.000_001_5), log.clone());

        let changeset = ChangeSet::new(
            vec!["tests/test_foo.py".to_string()],
            vec!["src/bar.py".to_string()],
        );
        let result = job
            .run(&PathBuf::from("/repo"), &changeset, "emission_monitor")
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result["tests/test_foo.py"],
            EmissionValue::Grams(1.5)
        );

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].repo_name, "emission_monitor");
    }

    #[tokio::test]
    async fn empty_selection_still_logs_an_entry() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(EmissionsLog::new(dir.path().join("emissions_log.json")));
        let (job, executor) = job_with(Some(0.001), log.clone());

        let changeset = ChangeSet::new(vec!["src/bar.py".to_string()], vec![]);
        let result = job
            .run(&PathBuf::from("/repo"), &changeset, "repo")
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].emissions.is_empty());
    }

    #[tokio::test]
    async fn measurement_failure_becomes_error_string() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(EmissionsLog::new(dir.path().join("emissions_log.json")));
        let (job, _) = job_with(None, log);

        let changeset = ChangeSet::new(vec!["tests/test_foo.py".to_string()], vec![]);
        let result = job
            .run(&PathBuf::from("/repo"), &changeset, "repo")
            .await
            .unwrap();

        let expected = format!(
            "Error calculating emissions for tests/test_foo.py: {}",
            MeasurementError::NoData
        );
        assert_eq!(
            result["tests/test_foo.py"],
            EmissionValue::Error(expected)
        );
    }

    #[tokio::test]
    async fn duplicate_paths_are_measured_independently() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(EmissionsLog::new(dir.path().join("emissions_log.json")));
        let (job, executor) = job_with(Some(0.001), log);

        let changeset = ChangeSet::new(
            vec!["tests/test_foo.py".to_string()],
            vec!["tests/test_foo.py".to_string()],
        );
        let result = job
            .run(&PathBuf::from("/repo"), &changeset, "repo")
            .await
            .unwrap();

        // Two independent measurements, one key.
        assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.len(), 1);
    }
}
