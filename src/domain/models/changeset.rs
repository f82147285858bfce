//! Commit change-sets and measurement target selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The files touched by a single commit, as reported by the webhook payload.
///
/// Order is preserved from the payload and duplicates across the two
/// partitions are tolerated: a path listed in both `modified` and `added`
/// is processed independently each time it appears.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub added: Vec<String>,
}

impl ChangeSet {
    pub fn new(modified: Vec<String>, added: Vec<String>) -> Self {
        Self { modified, added }
    }

    /// All paths in the change-set, modified first, order and duplicates
    /// preserved.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.modified.iter().chain(self.added.iter())
    }

    /// Select the measurement targets from this change-set.
    ///
    /// Returns `(original relative path, resolved absolute path)` pairs,
    /// preserving the original order and duplicates. Results are keyed by
    /// the relative path downstream, so both are carried.
    pub fn select_targets(&self, repo_folder: &Path) -> Vec<(String, PathBuf)> {
        self.paths()
            .filter(|p| is_measurement_target(p))
            .map(|p| (p.clone(), repo_folder.join(p)))
            .collect()
    }
}

/// Whether a changed file qualifies for emissions probing.
///
/// A path qualifies iff it is not compiled bytecode, begins with the
/// literal `tests` prefix, and its base name contains `test_`. All three
/// clauses must hold. The prefix is a plain string match, so a sibling
/// directory like `tests_extra/` also qualifies.
pub fn is_measurement_target(path: &str) -> bool {
    if path.ends_with(".pyc") {
        return false;
    }
    if !path.starts_with("tests") {
        return false;
    }
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|base| base.contains("test_"))
}
