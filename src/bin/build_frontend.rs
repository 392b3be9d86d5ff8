//! Build the frontend by running the bundler's entry script directly.
//!
//! Exits 1 if the entry script is missing or cannot be spawned, otherwise
//! with the build's own exit code.

use anyhow::Result;
use devprobes::app;
use devprobes::services::FrontendBuilder;
use devprobes::services::build::exit_code_for;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("build-frontend")?;
    let cwd = app::current_dir()?;

    let builder = FrontendBuilder::new(tool.config.build.clone());

    let plan = match builder.prepare(&cwd) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let runtime = app::runtime()?;
    let outcome = runtime.block_on(builder.run(&plan));

    match &outcome {
        Ok(0) => tracing::info!("Frontend build succeeded"),
        Ok(code) => tracing::error!("Frontend build failed with exit code {}", code),
        Err(e) => tracing::error!("Frontend build failed: {}", e),
    }

    Ok(ExitCode::from(exit_code_for(&outcome)))
}
