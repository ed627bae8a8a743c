//! Shared helpers for integration tests: a scripted process launcher, a fake
//! elevator and a log capture.

#![allow(dead_code)]

use lazywin11::error::{Result, SetupError};
use lazywin11::{CommandRunner, CommandSpec, Elevator, ExecResult, ProcessLauncher};
use std::cell::Cell;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Records every launch and answers from a table of canned results.
///
/// Unmatched commands succeed with empty output.
#[derive(Clone, Default)]
pub struct ScriptedLauncher {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    responses: Arc<Mutex<Vec<(String, Option<String>, ExecResult)>>>,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program [subcommand]` with `result`. First matching rule wins.
    pub fn respond(self, program: &str, subcommand: Option<&str>, result: ExecResult) -> Self {
        self.responses.lock().unwrap().push((
            program.to_string(),
            subcommand.map(str::to_string),
            result,
        ));
        self
    }

    pub fn runner(&self, dry_run: bool) -> CommandRunner {
        CommandRunner::new(Box::new(self.clone()), dry_run)
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str, subcommand: Option<&str>) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.program == program && (subcommand.is_none() || c.subcommand() == subcommand))
            .count()
    }
}

impl ProcessLauncher for ScriptedLauncher {
    fn launch(&self, spec: &CommandSpec) -> io::Result<ExecResult> {
        self.calls.lock().unwrap().push(spec.clone());
        let responses = self.responses.lock().unwrap();
        let answer = responses
            .iter()
            .find(|(program, sub, _)| {
                *program == spec.program && sub.as_deref().is_none_or(|s| spec.subcommand() == Some(s))
            })
            .map(|(_, _, result)| result.clone())
            .unwrap_or_else(|| ExecResult::ok(""));
        Ok(answer)
    }
}

/// Elevator with a fixed answer that counts relaunch requests.
pub struct FakeElevator {
    pub elevated: bool,
    pub refuse: bool,
    pub relaunches: Cell<usize>,
}

impl FakeElevator {
    pub fn new(elevated: bool) -> Self {
        Self {
            elevated,
            refuse: false,
            relaunches: Cell::new(0),
        }
    }

    /// Unprivileged, and every relaunch request is declined.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(false)
        }
    }
}

impl Elevator for FakeElevator {
    fn is_elevated(&self) -> bool {
        self.elevated
    }

    fn relaunch_elevated(&self) -> Result<()> {
        self.relaunches.set(self.relaunches.get() + 1);
        if self.refuse {
            return Err(SetupError::elevation("The operation was canceled by the user."));
        }
        Ok(())
    }
}

/// In-memory log sink.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records every log line, and return both.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, buffer.contents())
}

/// Count log lines containing `needle`.
pub fn count_lines(logs: &str, needle: &str) -> usize {
    logs.lines().filter(|line| line.contains(needle)).count()
}
