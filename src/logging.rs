//! Console and log-file output for a run.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

/// Installed subscriber state. The level starts at INFO and is switched to
/// the configured one once the configuration has been read.
pub struct Logging {
    level: reload::Handle<LevelFilter, Registry>,
    path: PathBuf,
}

pub fn log_file_name(timestamp: &str) -> String {
    format!("TDM_generator_{timestamp}.log")
}

/// Log to stdout and to `TDM_generator_<timestamp>.log` in `dir`.
pub fn init(dir: &Path, timestamp: &str) -> Result<Logging> {
    let path = dir.join(log_file_name(timestamp));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let (filter, level) = reload::Layer::new(LevelFilter::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(Logging { level, path })
}

impl Logging {
    pub fn set_level(&self, level: LevelFilter) -> Result<()> {
        self.level
            .reload(level)
            .context("Failed to change log level")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
