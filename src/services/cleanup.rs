//! Test-data and build-output cleanup.
//!
//! Each target directory that exists is emptied but kept; targets that do not
//! exist are left absent.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// What happened to one cleanup target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// The directory existed and `removed` top-level entries were deleted
    Emptied { removed: usize },
    /// The directory did not exist and was not created
    Absent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub path: Utf8PathBuf,
    pub status: TargetStatus,
}

/// Outcome of a cleanup run, one entry per target in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub targets: Vec<TargetOutcome>,
}

impl CleanupReport {
    pub fn has_failures(&self) -> bool {
        self.targets
            .iter()
            .any(|t| matches!(t.status, TargetStatus::Failed(_)))
    }

    pub fn emptied_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t.status, TargetStatus::Emptied { .. }))
            .count()
    }
}

/// Remove everything inside `dir`, keeping `dir` itself.
///
/// Returns `None` when `dir` does not exist.
pub fn empty_directory(dir: &Utf8Path) -> Result<Option<usize>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir))? {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir))?;
        let path = entry.path();

        // Symlinks are removed as links, never followed
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove directory {}", path.display()))?;
        } else {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file {}", path.display()))?;
        }
        removed += 1;
    }

    Ok(Some(removed))
}

/// Empty each of `targets`, resolved against `root`.
///
/// A failing target is recorded and the remaining targets are still processed.
pub fn run_cleanup(root: &Utf8Path, targets: &[Utf8PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for target in targets {
        let path = root.join(target);

        let status = match empty_directory(&path) {
            Ok(Some(removed)) => {
                tracing::info!("Emptied {} ({} entries removed)", path, removed);
                TargetStatus::Emptied { removed }
            }
            Ok(None) => {
                tracing::info!("Skipping {} (does not exist)", path);
                TargetStatus::Absent
            }
            Err(e) => {
                tracing::error!("Failed to clean {}: {:#}", path, e);
                TargetStatus::Failed(format!("{:#}", e))
            }
        };

        report.targets.push(TargetOutcome { path, status });
    }

    tracing::info!(
        "Cleanup complete: {} of {} targets emptied",
        report.emptied_count(),
        report.targets.len()
    );

    report
}
