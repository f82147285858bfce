//! Process-backed test executor.
//!
//! Spawns a fresh child process per test file and captures its exit status
//! and standard error output.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::{MeasurementError, MeasurementResult};
use crate::domain::models::MeasurementConfig;
use crate::domain::ports::{ExecutionReport, TestExecutor};

/// Runs one test file per invocation via a configured interpreter command,
/// `python -m unittest <path>` by default.
pub struct ProcessTestExecutor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessTestExecutor {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &MeasurementConfig) -> Self {
        Self::new(
            config.test_command.clone(),
            config.test_args.clone(),
            Duration::from_secs(config.test_timeout_secs),
        )
    }
}

#[async_trait]
impl TestExecutor for ProcessTestExecutor {
    async fn execute(&self, test_file: &Path) -> MeasurementResult<ExecutionReport> {
        debug!(test_file = %test_file.display(), "running test");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(test_file)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on deadline expiry reaps the child.
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| MeasurementError::Launch(format!("{}: {e}", self.program)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| MeasurementError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|e| MeasurementError::Launch(format!("failed to wait for test process: {e}")))?;

        let report = ExecutionReport {
            success: output.status.success(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if report.success {
            debug!(test_file = %test_file.display(), "test executed successfully");
        } else {
            debug!(
                test_file = %test_file.display(),
                exit_code = ?report.exit_code,
                "test execution failed"
            );
        }

        Ok(report)
    }
}
