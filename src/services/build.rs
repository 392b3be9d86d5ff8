use crate::models::BuildSettings;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;

/// Production-mode variable forced on every build
pub const PRODUCTION_ENV: (&str, &str) = ("NODE_ENV", "production");

/// Errors from the frontend build wrapper
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Build entry point not found: {0}")]
    MissingEntryPoint(Utf8PathBuf),

    #[error("Failed to spawn build process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Build process terminated without an exit code")]
    Terminated,
}

/// Everything needed to launch the bundler
///
/// The environment here is applied to the child only.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub interpreter: String,
    pub entry_script: Utf8PathBuf,
    pub working_dir: Utf8PathBuf,
    pub env: IndexMap<String, String>,
}

/// Locates the bundler's build entry point and runs it as a subprocess
pub struct FrontendBuilder {
    settings: BuildSettings,
}

impl FrontendBuilder {
    pub fn new(settings: BuildSettings) -> Self {
        Self { settings }
    }

    /// The frontend directory for a given working directory
    ///
    /// Already inside it -> `cwd`, otherwise `cwd/<frontend_dir>`.
    pub fn resolve_frontend_dir(&self, cwd: &Utf8Path) -> Utf8PathBuf {
        if cwd.file_name() == Some(self.settings.frontend_dir.as_str()) {
            cwd.to_path_buf()
        } else {
            cwd.join(&self.settings.frontend_dir)
        }
    }

    /// Resolve the build plan, failing fast if the entry point is missing
    pub fn prepare(&self, cwd: &Utf8Path) -> Result<BuildPlan, BuildError> {
        let working_dir = self.resolve_frontend_dir(cwd);
        let entry_script = working_dir.join(&self.settings.entry_script);

        if !entry_script.is_file() {
            tracing::error!("Build script not found at {}", entry_script);
            return Err(BuildError::MissingEntryPoint(entry_script));
        }

        tracing::info!("Found build script at {}", entry_script);

        let mut env = self.settings.env.clone();
        env.insert(PRODUCTION_ENV.0.to_string(), PRODUCTION_ENV.1.to_string());

        Ok(BuildPlan {
            interpreter: self.settings.interpreter.clone(),
            entry_script,
            working_dir,
            env,
        })
    }

    /// Spawn the build with inherited stdio and wait for it
    ///
    /// # Returns
    /// The child's exit code (0 = success)
    pub async fn run(&self, plan: &BuildPlan) -> Result<i32, BuildError> {
        tracing::info!(
            "Running {} {} in {}",
            plan.interpreter,
            plan.entry_script,
            plan.working_dir
        );

        let start = Instant::now();

        let mut cmd = Command::new(&plan.interpreter);
        cmd.arg(plan.entry_script.as_str())
            .current_dir(&plan.working_dir)
            .envs(&plan.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn()?;
        let status = child.wait().await?;

        let exit_code = status.code().ok_or(BuildError::Terminated)?;

        tracing::info!(
            "Build process completed in {:.2}s with exit code {}",
            start.elapsed().as_secs_f32(),
            exit_code
        );

        Ok(exit_code)
    }
}

/// Map a build outcome to the wrapper's process exit code
///
/// Non-zero child codes pass through; anything that prevented a normal exit
/// code maps to 1.
pub fn exit_code_for(outcome: &Result<i32, BuildError>) -> u8 {
    match outcome {
        Ok(code) => u8::try_from(*code).unwrap_or(1),
        Err(_) => 1,
    }
}
