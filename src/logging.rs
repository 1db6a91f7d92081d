//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily-rotated file so that stdout stays reserved for the JSON
//! the command line prints.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "jira_service=info,warn";

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Daily rotating file appender in the user's local data directory
/// - Log level from `directives` (the `--log-filter` flag), else `RUST_LOG`,
///   else `jira_service=info,warn`
/// - Structured output with file/line numbers and thread IDs
///
/// # Log Directory
///
/// - Linux: `~/.local/share/jira-service/logs/`
/// - macOS: `~/Library/Application Support/jira-service/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\jira-service\logs\`
///
/// # Errors
///
/// Returns an error if:
/// - `directives` is not a valid filter
/// - The log directory cannot be determined or created
/// - The tracing subscriber cannot be set
///
/// # Example
///
/// ```no_run
/// use jira_service::logging;
///
/// logging::init(Some("jira_service=debug")).expect("Failed to initialize logging");
/// ```
pub fn init(directives: Option<&str>) -> anyhow::Result<()> {
    let filter = build_filter(directives)?;

    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "jira-service.log");

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jira-service starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

/// Explicit directives win over `RUST_LOG`.
fn build_filter(directives: Option<&str>) -> anyhow::Result<EnvFilter> {
    match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", directives, e)),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Get the log directory path.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("jira-service").join("logs"))
}
