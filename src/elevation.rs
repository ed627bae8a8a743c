//! Privilege detection and self-relaunch.
//!
//! Elevation is a one-way handoff: the unprivileged process asks the OS to
//! start a privileged copy of itself with the same arguments and then exits.
//! Nothing in memory crosses over; see [`crate::handoff`] for the selections.

use crate::error::Result;
use tracing::info;

/// What [`require_elevated`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Already privileged; carry on in this process.
    AlreadyElevated,
    /// A privileged copy was started; this process must exit with status 0.
    Relaunched,
}

/// OS privilege operations.
pub trait Elevator {
    fn is_elevated(&self) -> bool;

    /// Start an elevated copy of the current executable with the current arguments.
    fn relaunch_elevated(&self) -> Result<()>;
}

/// Ensure the rest of the run happens with elevated rights.
pub fn require_elevated(elevator: &dyn Elevator) -> Result<Elevation> {
    if elevator.is_elevated() {
        return Ok(Elevation::AlreadyElevated);
    }
    info!("Requesting administrative privileges (UAC)...");
    elevator.relaunch_elevated()?;
    Ok(Elevation::Relaunched)
}

/// The real OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemElevator;

impl Elevator for SystemElevator {
    fn is_elevated(&self) -> bool {
        platform::is_elevated()
    }

    fn relaunch_elevated(&self) -> Result<()> {
        platform::relaunch_elevated()
    }
}

/// Join arguments into one Windows command-line string.
///
/// Follows the `CommandLineToArgvW` rules: arguments with whitespace or quotes
/// are wrapped in quotes, embedded quotes are escaped, and backslashes are
/// doubled only where they precede a quote.
pub fn join_windows_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quote_windows_arg(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_windows_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '\n', '"']) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}

#[cfg(windows)]
mod platform {
    use super::join_windows_args;
    use crate::error::{Result, SetupError};
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
    use windows_sys::Win32::Security::{
        GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation,
    };
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    fn wide_null(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    pub fn is_elevated() -> bool {
        unsafe {
            let mut token: HANDLE = 0;
            if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
                return false;
            }

            let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
            let mut returned = 0u32;
            let ok = GetTokenInformation(
                token,
                TokenElevation,
                &mut elevation as *mut TOKEN_ELEVATION as *mut core::ffi::c_void,
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut returned,
            );
            CloseHandle(token);

            ok != 0 && elevation.TokenIsElevated != 0
        }
    }

    pub fn relaunch_elevated() -> Result<()> {
        let exe = std::env::current_exe()?;
        let args: Vec<String> = std::env::args().skip(1).collect();

        let exe_w = wide_null(exe.as_os_str());
        let verb = wide_null(OsStr::new("runas"));
        let params = wide_null(OsStr::new(&join_windows_args(&args)));
        let dir_w = std::env::current_dir()
            .map(|d| wide_null(d.as_os_str()))
            .unwrap_or_default();
        let dir_ptr = if dir_w.is_empty() {
            std::ptr::null()
        } else {
            dir_w.as_ptr()
        };

        let res = unsafe {
            ShellExecuteW(
                0,
                verb.as_ptr(),
                exe_w.as_ptr(),
                params.as_ptr(),
                dir_ptr,
                SW_SHOWNORMAL,
            )
        };
        // Values <= 32 are error codes (e.g. the user declined the UAC prompt)
        if res <= 32 {
            return Err(SetupError::elevation(format!(
                "ShellExecuteW failed with code {}",
                res
            )));
        }
        Ok(())
    }
}

#[cfg(unix)]
mod platform {
    use crate::error::{Result, SetupError};

    pub fn is_elevated() -> bool {
        nix::unistd::geteuid().is_root()
    }

    /// Re-run through `sudo`. On success the sudo child has already run to
    /// completion and this process exits inside the call.
    pub fn relaunch_elevated() -> Result<()> {
        sudo::escalate_if_needed()
            .map(|_| ())
            .map_err(|e| SetupError::elevation(e.to_string()))
    }
}

#[cfg(not(any(windows, unix)))]
mod platform {
    use crate::error::{Result, SetupError};

    pub fn is_elevated() -> bool {
        false
    }

    pub fn relaunch_elevated() -> Result<()> {
        Err(SetupError::elevation("elevation is not supported on this platform"))
    }
}
