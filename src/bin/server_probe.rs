//! Hit the local backend's health and API test endpoints.

use anyhow::Result;
use devprobes::app;
use devprobes::services::ApiClient;
use devprobes::services::probes::server_probe;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("server-probe")?;
    let config = &tool.config;
    let runtime = app::runtime()?;

    let client = ApiClient::new(&config.api.local_url, config.api.request_timeout(), false)?;
    let report = runtime.block_on(server_probe(&client));

    Ok(app::exit_code(config.strict_exit, report.passed()))
}
