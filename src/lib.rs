//! LazyWin11 Library
//!
//! Post-install setup for Windows 11: curated winget presets, browser and
//! antivirus choices, an optional Tron cleanup run, and UAC elevation.

pub mod catalog;
pub mod cleanup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod elevation;
pub mod error;
pub mod handoff;
pub mod logging;
pub mod orchestrator;
pub mod prompt;
pub mod runner;
pub mod sanity;
pub mod winget;

// Re-export main types for convenience
pub use catalog::{Antivirus, Browser, Preset, PresetOption, Toggle};
pub use cleanup::{CleanupTool, locate_entry_point};
pub use commands::{CommandSpec, ToolCommand};
pub use config::{RunConfig, Settings};
pub use elevation::{Elevation, Elevator, SystemElevator, require_elevated};
pub use error::SetupError;
pub use logging::Logger;
pub use orchestrator::{Orchestrator, RunOutcome};
pub use prompt::Prompter;
pub use runner::{CommandRunner, ExecResult, ProcessLauncher, SystemLauncher};
pub use winget::Winget;
