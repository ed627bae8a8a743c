//! End-to-end tests for the setup run
//!
//! These tests drive the orchestrator through its menus with scripted input
//! and verify:
//! - The dry-run scenario installs nothing and never elevates
//! - Default browser/antivirus choices and preset "None" install nothing
//! - The elevation handoff carries selections to the privileged process
//! - Closed input cancels the run

mod common;

use common::{FakeElevator, ScriptedLauncher, capture_logs, count_lines};
use lazywin11::handoff::{self, Handoff};
use lazywin11::{
    Antivirus, Browser, ExecResult, Orchestrator, Preset, Prompter, RunConfig, RunOutcome,
    SetupError, Settings,
};
use std::io::Cursor;
use std::time::Duration;

type TestPrompter = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

fn prompter(input: &str) -> TestPrompter {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn fast_settings(dir: &tempfile::TempDir) -> Settings {
    let mut settings = Settings::with_home(dir.path());
    settings.retry_delay = Duration::ZERO;
    settings
}

/// Run the orchestrator and return its outcome, the logs and the terminal output.
fn run(
    settings: &Settings,
    launcher: &ScriptedLauncher,
    elevator: &FakeElevator,
    dry_run: bool,
    input: &str,
) -> (Result<RunOutcome, SetupError>, String, String) {
    let runner = launcher.runner(dry_run);
    let ((outcome, output), logs) = capture_logs(|| {
        let mut orchestrator = Orchestrator::new(settings, &runner, elevator, prompter(input));
        let outcome = orchestrator.run();
        let (_, output) = orchestrator.into_prompter().into_parts();
        (outcome, String::from_utf8(output).unwrap())
    });
    (outcome, logs, output)
}

// Menu answers: preset (1-8 presets, 9 None), browser (1 Edge, 2 Chrome,
// 3 Firefox, 4 Nightly), antivirus (1 None, 2 Malwarebytes, 3 Avast,
// 4 Bitdefender), Tron (1 No, 2 Yes), then ENTER to confirm.

// =============================================================================
// Dry-run
// =============================================================================

#[test]
fn test_dry_run_developer_chrome_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(false);

    let (outcome, logs, output) = run(&settings, &launcher, &elevator, true, "2\n2\n1\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    for package in Preset::Developer.packages() {
        assert_eq!(
            count_lines(&logs, &format!("(dry-run) Would install {}", package)),
            1,
            "expected one dry-run line for {}",
            package
        );
    }
    assert_eq!(count_lines(&logs, "(dry-run) Would install"), 6);
    assert_eq!(count_lines(&logs, "6 package install(s) planned."), 1);
    assert_eq!(count_lines(&logs, "(dry-run) Would install Google.Chrome"), 1);
    assert_eq!(count_lines(&logs, "Skipping antivirus (using Windows Defender)."), 1);
    assert_eq!(count_lines(&logs, "Tron"), 0);
    assert_eq!(count_lines(&logs, "(dry-run) skipping UAC elevation."), 1);
    assert_eq!(elevator.relaunches.get(), 0);
    assert!(launcher.calls().is_empty());

    assert!(output.contains("=== SUMMARY ===\nPreset: Developer\nBrowser: Chrome\nAntivirus: None\nRun Tron: No\n"));
    assert!(logs.contains("All requested actions finished."));
    assert!(logs.contains("lazywin11.log"));
}

#[test]
fn test_dry_run_with_tron_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(false);

    let (outcome, logs, _) = run(&settings, &launcher, &elevator, true, "9\n1\n1\n2\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    assert_eq!(count_lines(&logs, "(dry-run) Would download and run Tron."), 1);
    assert_eq!(count_lines(&logs, "Create a VM snapshot / backup"), 1);
    assert!(!settings.scratch_dir().exists());
    assert!(launcher.calls().is_empty());
}

// =============================================================================
// Selections that install nothing
// =============================================================================

#[test]
fn test_preset_none_and_defaults_install_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(true);

    let (outcome, logs, _) = run(&settings, &launcher, &elevator, false, "9\n1\n1\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    assert_eq!(launcher.calls_to("winget", None), 0);
    assert_eq!(count_lines(&logs, "Applying preset"), 0);
    assert_eq!(count_lines(&logs, "Keeping Microsoft Edge as default."), 1);
    assert_eq!(count_lines(&logs, "Skipping antivirus (using Windows Defender)."), 1);
}

#[test]
fn test_preset_none_still_installs_browser_and_antivirus() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new().respond("winget", Some("list"), ExecResult::failed(1, ""));
    let elevator = FakeElevator::new(true);

    let (outcome, _, _) = run(&settings, &launcher, &elevator, false, "9\n3\n2\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    let installed: Vec<String> = launcher
        .calls()
        .into_iter()
        .filter(|c| c.subcommand() == Some("install"))
        .filter_map(|c| c.args.last().cloned())
        .collect();
    assert_eq!(installed, vec!["Mozilla.Firefox", "Malwarebytes.Malwarebytes"]);
}

// =============================================================================
// Real runs
// =============================================================================

#[test]
fn test_failed_packages_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = fast_settings(&dir);
    settings.install_retries = 0;
    let launcher = ScriptedLauncher::new()
        .respond("winget", Some("list"), ExecResult::failed(1, ""))
        .respond("winget", Some("install"), ExecResult::failed(1603, ""));
    let elevator = FakeElevator::new(true);

    let (outcome, logs, _) = run(&settings, &launcher, &elevator, false, "1\n2\n1\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    assert_eq!(count_lines(&logs, "Applying preset 'Gamer' (3 packages)."), 1);
    // 3 preset packages + Chrome
    assert_eq!(launcher.calls_to("winget", Some("install")), 4);
    for package in Preset::Gamer.packages() {
        assert_eq!(count_lines(&logs, &format!("Package {} failed to install.", package)), 1);
    }
    assert!(logs.contains("All requested actions finished."));
}

#[test]
fn test_already_installed_package_is_not_reinstalled() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new().respond(
        "winget",
        Some("list"),
        ExecResult::ok("Name    Id             Version\n--------------\nChrome  Google.Chrome  126.0\n"),
    );
    let elevator = FakeElevator::new(true);

    let (outcome, logs, _) = run(&settings, &launcher, &elevator, false, "9\n2\n1\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    assert_eq!(launcher.calls_to("winget", Some("list")), 1);
    assert_eq!(launcher.calls_to("winget", Some("install")), 0);
    assert_eq!(count_lines(&logs, "Google.Chrome already installed"), 1);
}

// =============================================================================
// Elevation handoff
// =============================================================================

#[test]
fn test_unprivileged_run_hands_off_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(false);

    let (outcome, _, _) = run(&settings, &launcher, &elevator, false, "5\n4\n3\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Relaunched);
    assert_eq!(elevator.relaunches.get(), 1);
    assert!(launcher.calls().is_empty());

    let config = handoff::take(settings.handoff_file(), false).unwrap();
    assert_eq!(
        config,
        RunConfig {
            dry_run: false,
            preset: Some(Preset::Productivity),
            browser: Browser::FirefoxNightly,
            antivirus: Antivirus::Avast,
            run_cleanup: false,
        }
    );
}

#[test]
fn test_elevated_run_resumes_from_handoff_without_prompting() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    Handoff::new(RunConfig {
        dry_run: false,
        preset: None,
        browser: Browser::Chrome,
        antivirus: Antivirus::None,
        run_cleanup: false,
    })
    .save_to_file(settings.handoff_file())
    .unwrap();

    let launcher = ScriptedLauncher::new().respond("winget", Some("list"), ExecResult::failed(1, ""));
    let elevator = FakeElevator::new(true);

    // No input at all: any prompt would cancel the run
    let (outcome, logs, output) = run(&settings, &launcher, &elevator, false, "");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    assert!(logs.contains("Resuming with the selections confirmed before elevation."));
    assert_eq!(launcher.calls_to("winget", Some("install")), 1);
    assert!(!output.contains("Select a preset:"));
    assert!(!settings.handoff_file().exists());
}

#[test]
fn test_unprivileged_run_ignores_pending_handoff() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    Handoff::new(RunConfig {
        dry_run: false,
        preset: Some(Preset::Gamer),
        browser: Browser::Chrome,
        antivirus: Antivirus::Avast,
        run_cleanup: true,
    })
    .save_to_file(settings.handoff_file())
    .unwrap();

    let launcher = ScriptedLauncher::new().respond("winget", Some("list"), ExecResult::failed(1, ""));
    let elevator = FakeElevator::new(false);

    // No input: the run must fall back to the menus, which cancel on closed input
    let (outcome, logs, output) = run(&settings, &launcher, &elevator, false, "");

    assert!(outcome.unwrap_err().is_cancelled());
    assert!(logs.contains("Ignoring pending selections: this process is not elevated."));
    assert!(!logs.contains("Resuming with the selections"));
    assert!(output.contains("Select a preset:"));
    assert!(launcher.calls().is_empty());
    assert_eq!(elevator.relaunches.get(), 0);
    assert!(!settings.handoff_file().exists());
}

#[test]
fn test_unprivileged_run_reconfirms_before_elevating() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    Handoff::new(RunConfig {
        dry_run: false,
        preset: Some(Preset::Gamer),
        browser: Browser::Chrome,
        antivirus: Antivirus::Avast,
        run_cleanup: true,
    })
    .save_to_file(settings.handoff_file())
    .unwrap();

    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(false);

    let (outcome, _, output) = run(&settings, &launcher, &elevator, false, "9
1
1
1

");

    assert_eq!(outcome.unwrap(), RunOutcome::Relaunched);
    assert!(output.contains("Press ENTER to begin (or Ctrl-C to cancel)..."));
    assert_eq!(elevator.relaunches.get(), 1);
    assert!(launcher.calls().is_empty());

    // The new answers replace the stale ones
    let config = handoff::take(settings.handoff_file(), false).unwrap();
    assert_eq!(config.preset, None);
    assert!(!config.run_cleanup);
}

#[test]
fn test_refused_elevation_removes_handoff() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::refusing();

    let (outcome, _, _) = run(&settings, &launcher, &elevator, false, "2
2
1
1

");

    assert!(matches!(outcome, Err(SetupError::Elevation(_))));
    assert_eq!(elevator.relaunches.get(), 1);
    assert!(launcher.calls().is_empty());
    assert!(!settings.handoff_file().exists());
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_closed_input_cancels_before_any_install() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(true);

    let (outcome, _, _) = run(&settings, &launcher, &elevator, false, "2\n2\n");

    assert!(outcome.unwrap_err().is_cancelled());
    assert!(launcher.calls().is_empty());
}

#[test]
fn test_cancel_at_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(false);

    let (outcome, _, output) = run(&settings, &launcher, &elevator, false, "2\n2\n1\n1\n");

    assert!(outcome.unwrap_err().is_cancelled());
    assert!(output.contains("Press ENTER to begin (or Ctrl-C to cancel)..."));
    assert_eq!(elevator.relaunches.get(), 0);
    assert!(!settings.handoff_file().exists());
}

#[test]
fn test_invalid_answers_are_reprompted() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fast_settings(&dir);
    let launcher = ScriptedLauncher::new();
    let elevator = FakeElevator::new(false);

    let (outcome, logs, output) =
        run(&settings, &launcher, &elevator, true, "ten\n10\n9\n0\n1\n1\nx\n1\n\n");

    assert_eq!(outcome.unwrap(), RunOutcome::Completed);
    assert_eq!(output.matches("Invalid choice. Pick the number.").count(), 4);
    assert_eq!(count_lines(&logs, "(dry-run) Would install"), 0);
}
