//! Durable, append-only emissions log.
//!
//! The log is a single pretty-printed JSON array of entries. Appends are a
//! full read-modify-rewrite serialized behind an internal mutex, so
//! concurrent jobs against the same file never lose entries.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::models::LogEntry;

/// Append-only JSON record store for job results.
///
/// Owns the file path and the mutual-exclusion handle guarding it; jobs
/// receive this by `Arc` rather than reaching for an ambient path constant.
pub struct EmissionsLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl EmissionsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, leaving the file a valid JSON array afterwards.
    ///
    /// A missing or unparsable file is treated as an empty prior sequence,
    /// never as a fatal error. The rewrite goes through a temporary file and
    /// rename so an interrupted write cannot leave partial JSON behind.
    pub async fn append(&self, entry: LogEntry) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut entries = self.read_entries().await;
        entries.push(entry);

        let json = serde_json::to_string_pretty(&entries)
            .context("failed to serialize emissions log entries")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), total = entries.len(), "log entry appended");
        Ok(())
    }

    /// Read the persisted entries. Callers must hold the lock.
    async fn read_entries(&self) -> Vec<LogEntry> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "emissions log unparsable, starting from an empty sequence"
                );
                Vec::new()
            }
        }
    }

    /// Snapshot of the persisted entries, for inspection and tests.
    pub async fn entries(&self) -> Vec<LogEntry> {
        let _guard = self.lock.lock().await;
        self.read_entries().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::domain::models::{EmissionValue, EmissionsResult};

    fn entry(repo: &str, grams: f64) -> LogEntry {
        let mut emissions = EmissionsResult::new();
        emissions.insert("tests/test_a.py".to_string(), EmissionValue::Grams(grams));
        LogEntry::new(repo, emissions)
    }

    #[tokio::test]
    async fn append_creates_file_with_valid_array() {
        let dir = TempDir::new().unwrap();
        let log = EmissionsLog::new(dir.path().join("emissions_log.json"));

        log.append(entry("repo", 1.5)).await.unwrap();

        let raw = std::fs::read_to_string(log.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emissions_log.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let log = EmissionsLog::new(&path);
        log.append(entry("repo", 0.25)).await.unwrap();

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].repo_name, "repo");
    }

    #[tokio::test]
    async fn wrong_shape_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emissions_log.json");
        std::fs::write(&path, r#"{"repo_name": "not an array"}"#).unwrap();

        let log = EmissionsLog::new(&path);
        log.append(entry("repo", 0.25)).await.unwrap();
        assert_eq!(log.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_appends_lose_no_entries() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(EmissionsLog::new(dir.path().join("emissions_log.json")));

        let mut handles = Vec::new();
        for i in 0..8 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                // Stagger the appends so they genuinely interleave.
                tokio::time::sleep(std::time::Duration::from_millis(i * 3)).await;
                log.append(entry(&format!("repo-{i}"), i as f64)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(log.entries().await.len(), 8);
    }

    #[tokio::test]
    async fn entries_accumulate_across_appends() {
        let dir = TempDir::new().unwrap();
        let log = EmissionsLog::new(dir.path().join("emissions_log.json"));

        log.append(entry("repo", 1.0)).await.unwrap();
        log.append(entry("repo", 2.0)).await.unwrap();

        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
    }
}
