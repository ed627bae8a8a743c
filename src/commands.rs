//! Type-safe external command contracts.
//!
//! Every external program LazyWin11 invokes is described by a struct that
//! implements [`ToolCommand`]. The struct produces the program name and an
//! argument vector; nothing is ever concatenated into a shell string, so
//! package identifiers and paths reach the child process exactly as given.
//!
//! # Example
//!
//! ```ignore
//! use lazywin11::commands::{ToolCommand, WingetInstall};
//!
//! let cmd = WingetInstall { package_id: "Git.Git".into() };
//! assert_eq!(cmd.program(), "winget");
//! assert_eq!(cmd.to_cli_args().last().unwrap(), "Git.Git");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Trait for typed external commands.
///
/// # Contract
///
/// - `program()`: executable name, resolved through the search path at launch.
/// - `to_cli_args()`: arguments exactly as the program expects them, one per element.
/// - `working_dir()`: directory to start the program in, if it matters.
/// - `interactive()`: whether the program talks to the user directly. Interactive
///   commands inherit the console instead of having their output captured.
pub trait ToolCommand {
    fn program(&self) -> &'static str;

    fn to_cli_args(&self) -> Vec<String>;

    fn working_dir(&self) -> Option<&Path> {
        None
    }

    fn interactive(&self) -> bool {
        false
    }

    /// Freeze the command into a launchable [`CommandSpec`].
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            program: self.program().to_string(),
            args: self.to_cli_args(),
            cwd: self.working_dir().map(Path::to_path_buf),
            interactive: self.interactive(),
        }
    }
}

/// A fully resolved command line, ready to hand to a process launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub interactive: bool,
}

impl CommandSpec {
    /// First argument, which is the subcommand for winget-style tools.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// winget
// ============================================================================

/// `winget list --id <id>`: is the package present on this machine?
#[derive(Debug, Clone)]
pub struct WingetList {
    pub package_id: String,
}

impl ToolCommand for WingetList {
    fn program(&self) -> &'static str {
        "winget"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "list".to_string(),
            "--id".to_string(),
            self.package_id.clone(),
            // Without these winget may stop and wait for an agreement prompt
            "--accept-source-agreements".to_string(),
            "--disable-interactivity".to_string(),
        ]
    }
}

/// `winget install --silent ... --id <id>`
#[derive(Debug, Clone)]
pub struct WingetInstall {
    pub package_id: String,
}

impl ToolCommand for WingetInstall {
    fn program(&self) -> &'static str {
        "winget"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "install".to_string(),
            "--silent".to_string(),
            "--accept-source-agreements".to_string(),
            "--accept-package-agreements".to_string(),
            "--disable-interactivity".to_string(),
            "--id".to_string(),
            self.package_id.clone(),
        ]
    }
}

// ============================================================================
// Cleanup tool fetch
// ============================================================================

/// `curl -L --fail -o <dest> <url>`
///
/// curl ships with Windows 10 1803 and later.
#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub url: String,
    pub destination: PathBuf,
}

impl ToolCommand for DownloadFile {
    fn program(&self) -> &'static str {
        "curl"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-L".to_string(),
            "--fail".to_string(),
            "-o".to_string(),
            self.destination.display().to_string(),
            self.url.clone(),
        ]
    }
}

/// `tar -xf <archive> -C <dest>` (bsdtar on Windows reads zip archives)
#[derive(Debug, Clone)]
pub struct ExtractArchive {
    pub archive: PathBuf,
    pub destination: PathBuf,
}

impl ToolCommand for ExtractArchive {
    fn program(&self) -> &'static str {
        "tar"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-xf".to_string(),
            self.archive.display().to_string(),
            "-C".to_string(),
            self.destination.display().to_string(),
        ]
    }
}

/// `cmd /C <script>` run from the script's own folder.
#[derive(Debug, Clone)]
pub struct RunBatchScript {
    pub script: PathBuf,
}

impl ToolCommand for RunBatchScript {
    fn program(&self) -> &'static str {
        "cmd"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["/C".to_string(), self.script.display().to_string()]
    }

    fn working_dir(&self) -> Option<&Path> {
        self.script.parent()
    }

    fn interactive(&self) -> bool {
        true
    }
}
