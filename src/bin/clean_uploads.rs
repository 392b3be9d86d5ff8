//! Delete every regular file in the uploads directory.
//!
//! Subdirectories are left alone. If the directory is missing it is created.

use anyhow::Result;
use devprobes::app;
use devprobes::services::clean_uploads;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("clean-uploads")?;
    let uploads_dir = app::current_dir()?.join(&tool.config.paths.uploads_dir);

    let passed = match clean_uploads(&uploads_dir) {
        Ok(report) => !report.has_failures(),
        Err(e) => {
            tracing::error!("{:#}", e);
            false
        }
    };

    Ok(app::exit_code(tool.config.strict_exit, passed))
}
