//! winget adapter.
//!
//! Presence checks and installs with a bounded retry. Install failures are
//! logged and reported as `false`; they never abort the run.

use crate::commands::{WingetInstall, WingetList};
use crate::runner::CommandRunner;
use std::time::Duration;
use tracing::{error, info, warn};

/// Package manager operations backed by the `winget` CLI.
pub struct Winget<'a> {
    runner: &'a CommandRunner,
    retry_delay: Duration,
}

impl<'a> Winget<'a> {
    pub fn new(runner: &'a CommandRunner, retry_delay: Duration) -> Self {
        Self {
            runner,
            retry_delay,
        }
    }

    /// Ask winget whether `package_id` is installed.
    ///
    /// Always `false` in dry-run mode so simulated runs never skip an install.
    pub fn is_installed(&self, package_id: &str) -> bool {
        let result = self.runner.run(&WingetList {
            package_id: package_id.to_string(),
        });
        if self.runner.is_dry_run() || !result.success() {
            return false;
        }
        listing_mentions(&result.stdout, package_id)
    }

    /// Install `package_id`, trying up to `retries + 1` times.
    ///
    /// Returns `true` if the package was installed or already present.
    pub fn install(&self, package_id: &str, retries: u32) -> bool {
        if self.runner.is_dry_run() {
            info!("(dry-run) Would install {}", package_id);
            return true;
        }

        if self.is_installed(package_id) {
            info!("{} already installed — skipping.", package_id);
            return true;
        }

        let command = WingetInstall {
            package_id: package_id.to_string(),
        };
        let attempts = retries + 1;
        for attempt in 1..=attempts {
            let result = self.runner.run(&command);
            if result.success() {
                info!("Installed {} successfully.", package_id);
                return true;
            }
            warn!(
                "Attempt {} failed for {} (code {}).",
                attempt, package_id, result.code
            );
            if attempt < attempts {
                std::thread::sleep(self.retry_delay);
            }
        }

        error!("Failed to install {} after {} attempts.", package_id, attempts);
        false
    }
}

/// Does a `winget list` listing show the package?
///
/// Matches the id case-insensitively, or accepts a table with a "Name" header
/// and at least one row below it.
fn listing_mentions(stdout: &str, package_id: &str) -> bool {
    let out = stdout.to_lowercase();
    out.contains(&package_id.to_lowercase()) || (out.contains("name") && out.lines().count() > 2)
}
