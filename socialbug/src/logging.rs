use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default log directory: `<config dir>/socialbug/logs`
pub fn default_logs_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(anyhow::anyhow!("Could not find config directory"))?;
    Ok(config_dir.join("socialbug").join("logs"))
}

/// Log file name for a run started now
fn log_file_name() -> String {
    format!("socialbug-{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize tracing with one log file per run
///
/// Stdout belongs to the command output, so nothing is logged there.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(logs_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(logs_dir)?;

    let log_filename = log_file_name();
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    // Flushes for the whole process lifetime
    std::mem::forget(guard);

    Ok(log_path)
}
