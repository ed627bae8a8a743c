//! Command execution.
//!
//! All external programs go through [`CommandRunner::run`]. The runner logs the
//! command line, honours dry-run mode, and folds every outcome into an
//! [`ExecResult`]: a non-zero exit is data, not an error, and a spawn failure
//! becomes exit code 1 with the fault message as stderr.
//!
//! The actual process creation sits behind [`ProcessLauncher`] so the rest of
//! the crate can be driven against scripted results.

use crate::commands::{CommandSpec, ToolCommand};
use std::io;
use std::process::Command;
use tracing::{debug, error, info};

/// Marker stdout returned for commands skipped in dry-run mode.
pub const DRY_RUN_MARKER: &str = "(dry-run)";

/// Outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code (-1 if terminated without one)
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    /// Successful result with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed result with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Creates processes. Implemented by [`SystemLauncher`] in production.
pub trait ProcessLauncher {
    fn launch(&self, spec: &CommandSpec) -> io::Result<ExecResult>;
}

/// Launches real child processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, spec: &CommandSpec) -> io::Result<ExecResult> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        if spec.interactive {
            // The child owns the console; nothing to capture
            let status = cmd.status()?;
            return Ok(ExecResult {
                code: status.code().unwrap_or(-1),
                stdout: String::new(),
                stderr: String::new(),
            });
        }

        let output = cmd.output()?;
        Ok(ExecResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Runs [`ToolCommand`]s, logging each one.
pub struct CommandRunner {
    launcher: Box<dyn ProcessLauncher>,
    dry_run: bool,
}

impl CommandRunner {
    pub fn new(launcher: Box<dyn ProcessLauncher>, dry_run: bool) -> Self {
        Self { launcher, dry_run }
    }

    /// Runner backed by real processes.
    pub fn system(dry_run: bool) -> Self {
        Self::new(Box::new(SystemLauncher), dry_run)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute a command and return its result.
    ///
    /// Never fails: in dry-run mode nothing is launched and a synthetic success
    /// carrying [`DRY_RUN_MARKER`] is returned.
    pub fn run<C: ToolCommand + ?Sized>(&self, command: &C) -> ExecResult {
        self.run_spec(&command.spec())
    }

    pub fn run_spec(&self, spec: &CommandSpec) -> ExecResult {
        info!("> {}", spec);

        if self.dry_run {
            return ExecResult::ok(DRY_RUN_MARKER);
        }

        match self.launcher.launch(spec) {
            Ok(result) => {
                info!("Return code: {}", result.code);
                if !result.stdout.trim().is_empty() {
                    debug!("{}", result.stdout.trim());
                }
                if !result.stderr.trim().is_empty() {
                    debug!("{}", result.stderr.trim());
                }
                result
            }
            Err(e) => {
                error!("Command failed: {}", e);
                ExecResult::failed(1, e.to_string())
            }
        }
    }
}
