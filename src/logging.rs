use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install the global subscriber, appending to the log file in the data dir.
///
/// The TUI owns stdout, so nothing is ever logged to the terminal.
pub(crate) fn init(config: &AppConfig) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid log filter: {}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::debug!(path = %config.log_path.display(), "logging initialised");
    Ok(())
}
