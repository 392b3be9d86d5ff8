//! POST the example credentials to the local backend's login endpoint.

use anyhow::Result;
use devprobes::app;
use devprobes::services::ApiClient;
use devprobes::services::probes::login_probe;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("login-probe")?;
    let config = &tool.config;
    let runtime = app::runtime()?;

    let client = ApiClient::new(&config.api.local_url, config.api.request_timeout(), false)?;
    let report = runtime.block_on(login_probe(&client, &config.credentials));

    Ok(app::exit_code(config.strict_exit, report.passed()))
}
