use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "POMORA_LOG";

/// Send tracing output to `path`. The terminal belongs to the TUI, so nothing
/// is ever logged to stdout or stderr.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("pomora=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}
