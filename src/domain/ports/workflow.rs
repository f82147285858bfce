//! Downstream optimization workflow port.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::models::{EmissionValue, EmissionsResult};

/// Trait for the downstream code-optimization workflow.
///
/// Invoked only after a job has completed and its log entry is durable,
/// taking the job's result as input. The measurement pipeline itself has
/// no outbound dependency on source-control write access; implementations
/// own whatever branching or pull-request machinery they need.
#[async_trait]
pub trait OptimizationWorkflow: Send + Sync {
    async fn notify(&self, repo_name: &str, result: &EmissionsResult) -> anyhow::Result<()>;
}

/// No-op workflow used when no downstream optimization is configured.
#[derive(Debug, Default)]
pub struct NullWorkflow;

#[async_trait]
impl OptimizationWorkflow for NullWorkflow {
    async fn notify(&self, repo_name: &str, result: &EmissionsResult) -> anyhow::Result<()> {
        tracing::debug!(
            repo_name,
            targets = result.len(),
            "no optimization workflow configured"
        );
        Ok(())
    }
}

/// Workflow that reports each target's outcome to the log sink instead of
/// driving an optimization pipeline.
#[derive(Debug, Default)]
pub struct LoggingWorkflow;

#[async_trait]
impl OptimizationWorkflow for LoggingWorkflow {
    async fn notify(&self, repo_name: &str, result: &EmissionsResult) -> anyhow::Result<()> {
        for (target, value) in result {
            match value {
                EmissionValue::Grams(grams) => {
                    info!(repo_name, target = %target, grams, "target measured");
                }
                EmissionValue::Error(error) => {
                    warn!(repo_name, target = %target, error = %error, "target not measured");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logging_workflow_accepts_mixed_results() {
        let mut result = EmissionsResult::new();
        result.insert("tests/test_a.py".to_string(), EmissionValue::Grams(1.5));
        result.insert(
            "tests/test_b.py".to_string(),
            EmissionValue::Error("no data".to_string()),
        );

        LoggingWorkflow.notify("repo", &result).await.unwrap();
        NullWorkflow.notify("repo", &result).await.unwrap();
    }
}
