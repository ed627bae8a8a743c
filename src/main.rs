//! LazyWin11 - Main entry point
//!
//! Interactive post-install setup for Windows 11.
//!
//! Usage:
//!   lazywin11             # interactive run (will request elevation)
//!   lazywin11 --dry-run   # shows actions but doesn't perform installs

use anyhow::Context;
use lazywin11::cli::Cli;
use lazywin11::{
    CommandRunner, Logger, Orchestrator, Prompter, RunOutcome, Settings, SystemElevator,
};
use std::io;
use tracing::{error, warn};

/// Log the cancellation and leave with status 0.
fn exit_canceled() -> ! {
    warn!("User canceled.");
    println!("\nCanceled by user.");
    std::process::exit(0);
}

/// Main application entry point
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let settings = Settings::from_env()?;
    settings
        .ensure_home()
        .with_context(|| format!("Failed to create {}", settings.home.display()))?;

    // Initialize logging first
    let logger = Logger::new(settings.log_file())?;
    logger.install()?;

    // Ctrl-C at any prompt (or during an install) aborts the whole run
    if let Err(e) = ctrlc::set_handler(|| {
        exit_canceled();
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let runner = CommandRunner::system(cli.dry_run);
    let elevator = SystemElevator;
    let prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let mut orchestrator = Orchestrator::new(&settings, &runner, &elevator, prompter);

    match orchestrator.run() {
        Ok(RunOutcome::Completed) => Ok(()),
        Ok(RunOutcome::Relaunched) => std::process::exit(0),
        Err(e) if e.is_cancelled() => exit_canceled(),
        Err(e) => {
            error!("Unhandled error: {}", e);
            Err(e.into())
        }
    }
}
