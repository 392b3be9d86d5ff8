//! Register a fresh test user on the local backend, then log in as it.

use anyhow::Result;
use devprobes::app;
use devprobes::services::ApiClient;
use devprobes::services::probes::{generate_user, registration_probe};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let tool = app::start("register-probe")?;
    let config = &tool.config;
    let runtime = app::runtime()?;

    let client = ApiClient::new(&config.api.local_url, config.api.request_timeout(), false)?;
    let user = generate_user(&config.registration, &mut rand::thread_rng());

    let report = runtime.block_on(registration_probe(&client, &user));

    Ok(app::exit_code(config.strict_exit, report.passed()))
}
