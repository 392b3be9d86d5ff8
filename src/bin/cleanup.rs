//! Empty the test-data and build output directories.
//!
//! Directories that exist are emptied and kept; missing ones stay missing.

use anyhow::Result;
use devprobes::app;
use devprobes::services::run_cleanup;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("cleanup")?;
    let root = app::current_dir()?;

    let report = run_cleanup(&root, &tool.config.paths.cleanup_targets);

    Ok(app::exit_code(
        tool.config.strict_exit,
        !report.has_failures(),
    ))
}
