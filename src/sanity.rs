//! Pre-flight checks for the runtime environment.
//!
//! Nothing here is fatal. A missing winget means every install will fail on
//! its own and be logged; a missing curl or tar only matters if the cleanup
//! tool is requested.

use tracing::{debug, warn};

/// Result of environment verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityCheckResult {
    pub winget: bool,
    pub missing_optional: Vec<String>,
}

impl SanityCheckResult {
    /// Returns true if every tool was found
    pub fn is_ok(&self) -> bool {
        self.winget && self.missing_optional.is_empty()
    }
}

/// Needed only for the cleanup tool
const OPTIONAL_BINARIES: &[&str] = &["curl", "tar"];

/// Check if a binary is available in PATH
pub fn binary_exists(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Look for every external tool LazyWin11 uses
pub fn verify_environment() -> SanityCheckResult {
    let missing_optional = OPTIONAL_BINARIES
        .iter()
        .filter(|binary| !binary_exists(binary))
        .map(|binary| (*binary).to_string())
        .collect();

    SanityCheckResult {
        winget: binary_exists("winget"),
        missing_optional,
    }
}

/// Log what is missing. Never stops the run.
pub fn run_preflight_checks() -> SanityCheckResult {
    debug!("Running pre-flight checks...");

    let result = verify_environment();

    if !result.winget {
        warn!("WARNING: 'winget' not found on this system PATH. Winget operations will fail.");
    }
    for binary in &result.missing_optional {
        debug!("Optional binary not found: {} (only needed for Tron)", binary);
    }
    if result.is_ok() {
        debug!("All external tools found.");
    }

    result
}
