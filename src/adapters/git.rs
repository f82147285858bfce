//! Source updater: pulls the watched repository before scheduling a job.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

/// Runs `git pull` in the configured checkout.
///
/// Pull failures are logged and tolerated: a stale checkout still yields a
/// meaningful (if slightly outdated) measurement, and the webhook response
/// must not depend on remote availability.
pub struct SourceUpdater {
    repo_folder: PathBuf,
}

impl SourceUpdater {
    pub fn new(repo_folder: impl Into<PathBuf>) -> Self {
        Self {
            repo_folder: repo_folder.into(),
        }
    }

    pub fn repo_folder(&self) -> &Path {
        &self.repo_folder
    }

    /// Pull the latest changes, best-effort.
    pub async fn pull(&self) {
        let result = Command::new("git")
            .arg("pull")
            .current_dir(&self.repo_folder)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                info!(repo = %self.repo_folder.display(), "repository updated");
            }
            Ok(output) => {
                warn!(
                    repo = %self.repo_folder.display(),
                    exit_code = ?output.status.code(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git pull failed, continuing with current checkout"
                );
            }
            Err(e) => {
                warn!(
                    repo = %self.repo_folder.display(),
                    error = %e,
                    "failed to launch git, continuing with current checkout"
                );
            }
        }
    }
}
