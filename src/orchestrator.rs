//! The setup run, start to finish.
//!
//! A straight line: preflight, selections, summary and confirmation,
//! elevation, preset, browser, antivirus, cleanup tool, done. Individual
//! install failures are logged and skipped; only cancellation and faults end
//! the run early.

use crate::catalog::{Antivirus, Browser, Preset, PresetOption, Toggle};
use crate::cleanup::CleanupTool;
use crate::config::{APP_NAME, RunConfig, Settings};
use crate::elevation::{self, Elevation, Elevator};
use crate::error::Result;
use crate::handoff::{self, Handoff};
use crate::prompt::Prompter;
use crate::runner::CommandRunner;
use crate::sanity;
use crate::winget::Winget;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every requested step ran (individual steps may have failed softly).
    Completed,
    /// An elevated copy took over; this process should exit with status 0.
    Relaunched,
}

/// Drives one setup run.
pub struct Orchestrator<'a, R, W> {
    settings: &'a Settings,
    runner: &'a CommandRunner,
    elevator: &'a dyn Elevator,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> Orchestrator<'a, R, W> {
    pub fn new(
        settings: &'a Settings,
        runner: &'a CommandRunner,
        elevator: &'a dyn Elevator,
        prompter: Prompter<R, W>,
    ) -> Self {
        Self {
            settings,
            runner,
            elevator,
            prompter,
        }
    }

    fn dry_run(&self) -> bool {
        self.runner.is_dry_run()
    }

    /// Run every step in order.
    pub fn run(&mut self) -> Result<RunOutcome> {
        info!("{} starting. Dry-run={}", APP_NAME, self.dry_run());
        sanity::run_preflight_checks();

        let config = match self.resume_from_handoff() {
            Some(config) => {
                info!("Resuming with the selections confirmed before elevation.");
                config
            }
            None => {
                let config = self.collect_selections()?;
                self.confirm(&config)?;

                if self.ensure_elevated(&config)? == Elevation::Relaunched {
                    return Ok(RunOutcome::Relaunched);
                }
                config
            }
        };

        self.execute(&config);

        info!(
            "All requested actions finished. Check the log for details: {}",
            self.settings.log_file().display()
        );
        self.prompter.say("")?;
        self.prompter.say(
            "Done. If anything failed, consult the log above and re-run the installer or install manually.",
        )?;
        Ok(RunOutcome::Completed)
    }

    /// Selections handed over by the unprivileged process, if this process may use them.
    ///
    /// A pending file is always consumed. It is honoured only by an elevated
    /// process (or a dry run, which never elevates); an unprivileged run
    /// discards it and asks again.
    fn resume_from_handoff(&self) -> Option<RunConfig> {
        let config = handoff::take(self.settings.handoff_file(), self.dry_run())?;
        if self.dry_run() || self.elevator.is_elevated() {
            Some(config)
        } else {
            warn!("Ignoring pending selections: this process is not elevated.");
            None
        }
    }

    /// Ask every menu question.
    pub fn collect_selections(&mut self) -> Result<RunConfig> {
        let preset = self
            .prompter
            .ask("Select a preset:", &PresetOption::menu())?
            .preset();
        let browser = self.prompter.ask("Pick a browser:", &Browser::menu())?;
        let antivirus = self.prompter.ask("Install antivirus?", &Antivirus::menu())?;
        let cleanup = self.prompter.ask(
            "Run Tron cleanup script? (advanced - recommended only in VM)",
            &Toggle::menu(),
        )?;

        Ok(RunConfig {
            dry_run: self.dry_run(),
            preset,
            browser,
            antivirus,
            run_cleanup: cleanup.as_bool(),
        })
    }

    fn confirm(&mut self, config: &RunConfig) -> Result<()> {
        self.prompter.say("")?;
        self.prompter.say("=== SUMMARY ===")?;
        for line in config.summary_lines() {
            self.prompter.say(&line)?;
        }
        self.prompter.say("--------------------------")?;
        self.prompter
            .confirm("Press ENTER to begin (or Ctrl-C to cancel)...")
    }

    fn ensure_elevated(&self, config: &RunConfig) -> Result<Elevation> {
        if self.elevator.is_elevated() {
            return Ok(Elevation::AlreadyElevated);
        }
        if self.dry_run() {
            info!("(dry-run) skipping UAC elevation.");
            return Ok(Elevation::AlreadyElevated);
        }

        let handoff_path = self.settings.handoff_file();
        Handoff::new(*config).save_to_file(&handoff_path)?;
        match elevation::require_elevated(self.elevator) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // Nobody will consume it now
                if let Err(remove_err) = std::fs::remove_file(&handoff_path) {
                    warn!(
                        "Could not remove handoff file {}: {}",
                        handoff_path.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Install everything `config` asks for. Failures are logged, never raised.
    pub fn execute(&self, config: &RunConfig) {
        let winget = Winget::new(self.runner, self.settings.retry_delay);
        info!("{} package install(s) planned.", config.planned_installs());

        if let Some(preset) = config.preset {
            self.apply_preset(&winget, preset);
        }
        self.install_browser(&winget, config.browser);
        self.install_antivirus(&winget, config.antivirus);

        if config.run_cleanup {
            CleanupTool::new(self.runner, self.settings.scratch_dir()).run();
        }
    }

    fn apply_preset(&self, winget: &Winget<'_>, preset: Preset) {
        let packages = preset.packages();
        info!("Applying preset '{}' ({} packages).", preset, packages.len());
        for package in packages {
            if !winget.install(package, self.settings.install_retries) {
                warn!(
                    "Package {} failed to install. You can re-run the installer later or install manually.",
                    package
                );
            }
        }
    }

    fn install_browser(&self, winget: &Winget<'_>, browser: Browser) {
        match browser.package_id() {
            Some(id) => {
                winget.install(id, self.settings.install_retries);
            }
            None => info!("Keeping Microsoft Edge as default."),
        }
    }

    fn install_antivirus(&self, winget: &Winget<'_>, antivirus: Antivirus) {
        match antivirus.package_id() {
            Some(id) => {
                winget.install(id, self.settings.install_retries);
            }
            None => info!("Skipping antivirus (using Windows Defender)."),
        }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }
}
