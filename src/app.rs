//! Shared start-up for the tool binaries.
//!
//! Each binary:
//! 1. Loads [`ToolConfig`] from `devprobes.yaml` + environment
//! 2. Installs logging (console transcript, optional rotating file)
//! 3. Runs its service on a current-thread tokio runtime
//! 4. Maps the report to an exit code

use crate::config::ConfigManager;
use crate::models::ToolConfig;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;

/// A started tool: its configuration and the log guard to hold until exit
pub struct Tool {
    pub config: ToolConfig,
    _log_guard: Option<WorkerGuard>,
}

/// Load configuration from the working directory and install logging
pub fn start(tool_name: &str) -> Result<Tool> {
    let cwd = current_dir()?;
    let config = ConfigManager::new(&cwd).load()?;
    let log_guard = crate::logging::setup_logging(&config.logging, tool_name)?;

    tracing::info!("Starting {} ({} v{})", tool_name, crate::APP_NAME, crate::VERSION);

    Ok(Tool {
        config,
        _log_guard: log_guard,
    })
}

/// The working directory as a UTF-8 path
pub fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    Utf8PathBuf::try_from(cwd).context("Working directory is not valid UTF-8")
}

/// Single-threaded runtime; the tools await everything sequentially
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}

/// Exit code for a finished probe or cleaner
///
/// Failures are only reflected in the exit code when `strict_exit` is set;
/// otherwise the console transcript is the result.
pub fn exit_code(strict_exit: bool, passed: bool) -> ExitCode {
    if strict_exit && !passed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
