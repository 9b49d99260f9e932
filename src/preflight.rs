//! Process-start checks for the command-line binary
//!
//! The library never calls these; the binary runs them once before
//! dispatching a command.

use crate::error::{UserError, UserResult};

/// Detected platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Unsupported,
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            _ => Platform::Unsupported,
        }
    }

    /// Get a human-readable platform name
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Unsupported => "Unsupported",
        }
    }
}

/// Whether the process runs with an effective uid of 0
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

/// Fail unless running on Linux
pub fn require_linux() -> UserResult<()> {
    match Platform::detect() {
        Platform::Linux => Ok(()),
        Platform::Unsupported => Err(UserError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        )),
    }
}

/// Fail unless running as root
pub fn require_root(command: &str) -> UserResult<()> {
    if is_root() {
        Ok(())
    } else {
        Err(UserError::NotPrivileged(command.to_string()))
    }
}
