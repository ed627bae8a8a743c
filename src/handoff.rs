//! Carrying confirmed selections across the elevation relaunch.
//!
//! The unprivileged process writes the confirmed [`RunConfig`] to a JSON file
//! just before asking for elevation. The privileged process takes it (read and
//! delete) at startup. A file is honoured once, only while fresh, and only by
//! a process started in the same dry-run mode.

use crate::config::RunConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Handoff files older than this are ignored.
pub const HANDOFF_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// On-disk handoff record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    /// Seconds since the Unix epoch at write time.
    pub created_at: u64,
    pub config: RunConfig,
}

impl Handoff {
    pub fn new(config: RunConfig) -> Self {
        Self {
            created_at: unix_now(),
            config,
        }
    }

    /// Save the record as pretty JSON, replacing any previous file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn is_fresh(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) <= HANDOFF_MAX_AGE.as_secs()
    }
}

/// Take the handoff left by a previous process, if any.
///
/// The file is removed whether or not it is accepted. Returns `None` when there
/// is no file, or it is malformed, stale, or from a different dry-run mode.
pub fn take<P: AsRef<Path>>(path: P, dry_run: bool) -> Option<RunConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).ok()?;
    if let Err(e) = fs::remove_file(path) {
        warn!("Could not remove handoff file {}: {}", path.display(), e);
    }

    let handoff: Handoff = match serde_json::from_str(&content) {
        Ok(h) => h,
        Err(e) => {
            warn!("Ignoring unreadable handoff file {}: {}", path.display(), e);
            return None;
        }
    };

    if !handoff.is_fresh(unix_now()) {
        debug!("Ignoring stale handoff file written at {}", handoff.created_at);
        return None;
    }
    if handoff.config.dry_run != dry_run {
        debug!("Ignoring handoff file from a run with Dry-run={}", handoff.config.dry_run);
        return None;
    }

    Some(handoff.config)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
