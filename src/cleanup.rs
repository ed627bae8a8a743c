//! Tron cleanup tool: fetch, unpack, locate and run.
//!
//! The archive is trusted as downloaded; there is no checksum or signature check.

use crate::commands::{DownloadFile, ExtractArchive, RunBatchScript};
use crate::runner::CommandRunner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Latest Tron release archive.
pub const TRON_URL: &str = "https://github.com/bmrf/tron/releases/latest/download/tron.zip";

/// Script that starts Tron inside the extracted archive.
pub const TRON_ENTRY_POINT: &str = "tron.bat";

const ARCHIVE_NAME: &str = "tron.zip";

/// Downloads and runs Tron from a scratch directory.
pub struct CleanupTool<'a> {
    runner: &'a CommandRunner,
    scratch_dir: PathBuf,
    url: String,
}

impl<'a> CleanupTool<'a> {
    pub fn new<P: Into<PathBuf>>(runner: &'a CommandRunner, scratch_dir: P) -> Self {
        Self {
            runner,
            scratch_dir: scratch_dir.into(),
            url: TRON_URL.to_string(),
        }
    }

    /// Fetch from a different archive URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Run the cleanup tool. Returns `false` if any step before launch failed.
    pub fn run(&self) -> bool {
        warn!(
            "WARNING: Tron is a heavy cleanup tool. Create a VM snapshot / backup before running."
        );

        if self.runner.is_dry_run() {
            info!("(dry-run) Would download and run Tron.");
            return true;
        }

        if let Err(e) = fs::create_dir_all(&self.scratch_dir) {
            error!(
                "Could not create {}: {}. Aborting Tron run.",
                self.scratch_dir.display(),
                e
            );
            return false;
        }

        let archive = self.scratch_dir.join(ARCHIVE_NAME);
        let download = self.runner.run(&DownloadFile {
            url: self.url.clone(),
            destination: archive.clone(),
        });
        if !download.success() {
            error!("Downloading Tron failed (code {}). Aborting Tron run.", download.code);
            return false;
        }

        let extract = self.runner.run(&ExtractArchive {
            archive,
            destination: self.scratch_dir.clone(),
        });
        if !extract.success() {
            error!("Extracting Tron failed (code {}). Aborting Tron run.", extract.code);
            return false;
        }

        let Some(script) = locate_entry_point(&self.scratch_dir, TRON_ENTRY_POINT) else {
            error!(
                "Could not find {} after extracting. Aborting Tron run.",
                TRON_ENTRY_POINT
            );
            return false;
        };

        info!("Running Tron from: {}", script.display());
        let result = self.runner.run(&RunBatchScript { script });
        if !result.success() {
            warn!("Tron exited with code {}.", result.code);
        }
        true
    }
}

/// Find `file_name` under `root`.
///
/// Tie-break rule, name-ordered and shallow-first:
/// 1. the direct subdirectories of `root`, in file-name order; the first one
///    containing `file_name` wins;
/// 2. otherwise a depth-first walk of `root` in file-name order; the first
///    regular file called `file_name` wins.
pub fn locate_entry_point(root: &Path, file_name: &str) -> Option<PathBuf> {
    let mut children: Vec<PathBuf> = fs::read_dir(root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    children.sort();

    if let Some(found) = children
        .iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
    {
        return Some(found);
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
}
