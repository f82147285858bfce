//! Test executor port - interface for isolated test runs.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::MeasurementResult;

/// Outcome of one isolated test run.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Whether the test process exited successfully.
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard error output.
    pub stderr: String,
}

/// Trait for running a single test file in a fresh child process.
///
/// Implementations spawn exactly one child per invocation; that child's
/// resource usage is the thing being measured. Launch failures (missing
/// interpreter, missing file) surface as `MeasurementError::Launch`, never
/// as a panic through the measurement layer.
#[async_trait]
pub trait TestExecutor: Send + Sync {
    /// Execute the given test file, blocking until the child exits or the
    /// execution deadline expires.
    async fn execute(&self, test_file: &Path) -> MeasurementResult<ExecutionReport>;
}
