//! Runtime settings and the per-run selection record.

use crate::catalog::{Antivirus, Browser, Preset, Toggle};
use crate::error::{Result, SetupError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Product name used in log lines and messages.
pub const APP_NAME: &str = "LazyWin11Installer";

/// Environment variable that relocates the working directory.
pub const HOME_ENV: &str = "LAZYWIN_HOME";

const LOG_FILE_NAME: &str = "lazywin11.log";
const SCRATCH_DIR_NAME: &str = "tron_tmp";
const HANDOFF_FILE_NAME: &str = "pending-run.json";

/// Extra install attempts after the first one fails.
pub const DEFAULT_INSTALL_RETRIES: u32 = 1;

/// Pause between failed install attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Where LazyWin11 keeps its files and how hard it retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the log, the handoff file and the cleanup scratch dir.
    pub home: PathBuf,
    pub install_retries: u32,
    pub retry_delay: Duration,
}

impl Settings {
    /// Settings rooted at `home` with default tunables.
    pub fn with_home<P: Into<PathBuf>>(home: P) -> Self {
        Self {
            home: home.into(),
            install_retries: DEFAULT_INSTALL_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Resolve settings from the environment.
    ///
    /// `LAZYWIN_HOME` wins when set; otherwise the platform default is used.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(HOME_ENV) {
            Some(value) if value.is_empty() => {
                Err(SetupError::config(format!("{} is set but empty", HOME_ENV)))
            }
            Some(value) => Ok(Self::with_home(value)),
            None => Ok(Self::with_home(default_home()?)),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.home.join(LOG_FILE_NAME)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.home.join(SCRATCH_DIR_NAME)
    }

    pub fn handoff_file(&self) -> PathBuf {
        self.home.join(HANDOFF_FILE_NAME)
    }

    /// Create the home directory if it does not exist yet.
    pub fn ensure_home(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.home)?;
        Ok(&self.home)
    }
}

#[cfg(windows)]
fn default_home() -> Result<PathBuf> {
    Ok(PathBuf::from(r"C:\LazyWin11Installer"))
}

#[cfg(not(windows))]
fn default_home() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazywin11"))
        .ok_or_else(|| SetupError::config(format!("no data directory found; set {}", HOME_ENV)))
}

/// Everything the user chose for this run.
///
/// Built once from the menus and frozen after the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub dry_run: bool,
    pub preset: Option<Preset>,
    pub browser: Browser,
    pub antivirus: Antivirus,
    pub run_cleanup: bool,
}

impl RunConfig {
    /// Summary lines shown before the confirmation prompt.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Preset: {}",
                self.preset.map(|p| p.to_string()).unwrap_or_else(|| "None".to_string())
            ),
            format!("Browser: {}", self.browser),
            format!("Antivirus: {}", self.antivirus),
            format!("Run Tron: {}", Toggle::from(self.run_cleanup)),
        ]
    }

    /// Total winget installs this configuration asks for.
    pub fn planned_installs(&self) -> usize {
        self.preset.map(|p| p.packages().len()).unwrap_or(0)
            + usize::from(self.browser.package_id().is_some())
            + usize::from(self.antivirus.package_id().is_some())
    }
}
