//! External account-management commands
//!
//! Commands are always launched with an argument vector, never through a
//! shell, and only with names that already passed validation.

mod commands;
mod system;

pub use commands::CommandTable;
pub use system::SystemRunner;

use crate::error::UserResult;
use async_trait::async_trait;
use std::fmt;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command spec
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a successful batch command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

/// How an interactive command exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitSignal {
    /// Exit code, `None` if terminated by a signal
    pub code: Option<i32>,
}

impl ExitSignal {
    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands on behalf of the orchestrator
///
/// Implemented by [`SystemRunner`] for real processes; tests substitute a
/// recording runner.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion, capturing output
    ///
    /// A launch failure or non-zero exit is a `Command` error carrying the
    /// program, arguments and stderr.
    async fn run(&self, command: &CommandSpec) -> UserResult<CommandOutput>;

    /// Write `payload` once to stdin, close it and wait for exit
    ///
    /// Only a launch or write failure is an error; the exit status is
    /// returned for the caller to judge.
    async fn run_with_stdin(&self, command: &CommandSpec, payload: &str)
        -> UserResult<ExitSignal>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_display() {
        let spec = CommandSpec::new("usermod", ["-a", "-G", "dev", "bob"]);
        assert_eq!(spec.to_string(), "usermod -a -G dev bob");
    }

    #[test]
    fn exit_signal_success() {
        assert!(ExitSignal { code: Some(0) }.success());
        assert!(!ExitSignal { code: Some(1) }.success());
        assert!(!ExitSignal { code: None }.success());
    }
}
