//! Check that the document database is reachable and show what it holds.
//!
//! The connection string comes from `MONGODB_URI`.

use anyhow::Result;
use devprobes::app;
use devprobes::services::probe_database;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("db-probe")?;
    let runtime = app::runtime()?;

    let report = runtime.block_on(probe_database(&tool.config.database));

    if report.passed() {
        tracing::info!(
            "Database probe succeeded: {} collections",
            report.collections.len()
        );
    }

    Ok(app::exit_code(tool.config.strict_exit, report.passed()))
}
