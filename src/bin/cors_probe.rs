//! Exercise the deployed backend's CORS setup the way the frontend would.

use anyhow::Result;
use devprobes::app;
use devprobes::services::ApiClient;
use devprobes::services::probes::cors_probe;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("cors-probe")?;
    let api = &tool.config.api;
    let runtime = app::runtime()?;

    let credentialed = ApiClient::new(&api.deployed_url, api.request_timeout(), true)?
        .with_origin(&api.frontend_origin)?;
    let plain = ApiClient::new(&api.deployed_url, api.request_timeout(), false)?
        .with_origin(&api.frontend_origin)?;

    let report = runtime.block_on(cors_probe(
        &credentialed,
        &plain,
        &api.frontend_origin,
        &tool.config.registration,
    ));

    Ok(app::exit_code(tool.config.strict_exit, report.passed()))
}
