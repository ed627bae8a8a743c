//! Log sinks.
//!
//! One logger per process, built once at startup: an append-mode file sink
//! with timestamp and level on every line, and a console sink that mirrors
//! info-and-above messages without decoration. `RUST_LOG` overrides the file
//! filter (default `info`).

use crate::error::{Result, SetupError};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// The configured logger. Install it once with [`Logger::install`].
pub struct Logger {
    log_file: PathBuf,
    dispatch: Dispatch,
}

impl Logger {
    /// Open (or create) `log_file` for appending and build both sinks.
    pub fn new<P: AsRef<Path>>(log_file: P) -> Result<Self> {
        let log_file = log_file.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| {
                SetupError::logging(format!("cannot open {}: {}", log_file.display(), e))
            })?;

        let file_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_filter(file_filter);

        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .without_time()
            .with_level(false)
            .with_target(false)
            .with_filter(LevelFilter::INFO);

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        Ok(Self {
            log_file,
            dispatch: Dispatch::new(subscriber),
        })
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Make this logger the process-wide default.
    ///
    /// Process-wide so the Ctrl-C handler thread logs through the same sinks.
    pub fn install(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| SetupError::logging(e.to_string()))
    }
}
