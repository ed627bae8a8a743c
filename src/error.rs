//! Error handling module for LazyWin11
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Soft failures (a package that fails to install, a cleanup download that fails)
//! never surface here; they are logged and the run continues. These types cover
//! the faults that end a run.

use thiserror::Error;

/// Main error type for LazyWin11
#[derive(Error, Debug)]
pub enum SetupError {
    /// IO errors (log file, handoff file, terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (paths, environment overrides)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// The OS refused or failed the elevation request
    #[error("Elevation failed: {0}")]
    Elevation(String),

    /// Invalid arguments handed to a component (empty menu, etc.)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The user aborted the run (Ctrl-C or closed input)
    #[error("Canceled by user")]
    Cancelled,
}

/// Result type alias for LazyWin11 operations
pub type Result<T> = std::result::Result<T, SetupError>;

impl SetupError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Create an elevation error
    pub fn elevation(msg: impl Into<String>) -> Self {
        Self::Elevation(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True when the run ended because the user asked it to
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
