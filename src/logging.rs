use crate::models::LoggingSettings;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the level filter: `RUST_LOG` wins, otherwise debug or info.
pub fn build_env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Create the log directory if it doesn't exist.
pub fn ensure_log_dir(log_dir: &Utf8Path) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}

/// Setup console logging plus an optional daily rotating file.
///
/// The console is the probe transcript, so it always gets a layer. When
/// `settings.dir` is set, a non-blocking file layer is added with the
/// given prefix (usually the binary name).
///
/// # Returns
/// A guard that must be held for the duration of the program to keep file
/// logging active, or `None` when logging to the console only.
pub fn setup_logging(settings: &LoggingSettings, log_prefix: &str) -> Result<Option<WorkerGuard>> {
    let env_filter = build_env_filter(settings.debug);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_target(false);

    let guard = match &settings.dir {
        Some(log_dir) => {
            ensure_log_dir(log_dir)?;

            let file_appender = rolling::daily(log_dir, log_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            None
        }
    };

    tracing::debug!(
        "Logging initialized: dir={:?}, prefix={}, debug={}",
        settings.dir,
        log_prefix,
        settings.debug
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_log_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().join("logs")).unwrap();

        // Only directory creation; installing a global subscriber here would
        // conflict with other tests in the same process.
        ensure_log_dir(&log_dir).unwrap();
        assert!(log_dir.is_dir());

        // Idempotent
        ensure_log_dir(&log_dir).unwrap();
    }
}
