//! Upload directory cleaner.
//!
//! Deletes the regular files directly inside the uploads directory. Entries
//! that are not regular files are skipped, subdirectories are never entered,
//! and a failure on one entry does not stop the others.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;

/// Outcome of one upload-cleaning run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadCleanReport {
    /// The directory was absent and has been created; no entries were examined
    pub directory_created: bool,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl UploadCleanReport {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn summary(&self) -> String {
        if self.directory_created {
            "Uploads directory created".to_string()
        } else {
            format!(
                "Deleted {} files ({} failed, {} skipped)",
                self.deleted, self.failed, self.skipped
            )
        }
    }
}

/// Delete every regular file directly inside `dir`.
///
/// If `dir` does not exist it is created instead and nothing is deleted.
/// Only failing to read `dir` itself is an error; per-entry problems are
/// counted in the report.
pub fn clean_uploads(dir: &Utf8Path) -> Result<UploadCleanReport> {
    let mut report = UploadCleanReport::default();

    if !dir.exists() {
        tracing::info!("Uploads directory {} does not exist, creating it", dir);
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create uploads directory: {}", dir))?;
        report.directory_created = true;
        return Ok(report);
    }

    tracing::info!("Cleaning uploads directory {}", dir);

    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read uploads directory: {}", dir))?;

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::error!("Failed to read directory entry: {}", e);
                report.failed += 1;
                continue;
            }
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::error!("Failed to stat {}: {}", path.display(), e);
                report.failed += 1;
                continue;
            }
        };

        if !metadata.is_file() {
            tracing::info!("Skipping {} (not a regular file)", path.display());
            report.skipped += 1;
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Deleted {}", path.display());
                report.deleted += 1;
            }
            Err(e) => {
                tracing::error!("Failed to delete {}: {}", path.display(), e);
                report.failed += 1;
            }
        }
    }

    tracing::info!("{}", report.summary());

    Ok(report)
}
