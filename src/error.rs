//! Error types for linux-user
//!
//! All modules use `UserResult<T>` as their return type.

use crate::directory::Resource;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for linux-user operations
pub type UserResult<T> = Result<T, UserError>;

/// All errors that can occur in linux-user
#[derive(Error, Debug)]
pub enum UserError {
    // Input errors
    #[error("{operation}: invalid argument {value:?}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        value: String,
        reason: String,
    },

    // Directory errors
    #[error("No such entry in {resource}: {key}")]
    NotFound { resource: Resource, key: String },

    #[error("Malformed record in {path} at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    // Process errors
    #[error("Command failed: {command} {args:?}: {stderr}")]
    Command {
        command: String,
        args: Vec<String>,
        stderr: String,
    },

    // Environment errors
    #[error("Unsupported platform: {0}. linux-user only runs on Linux.")]
    UnsupportedPlatform(String),

    #[error("Insufficient privileges: {0} must be run as root")]
    NotPrivileged(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

/// Coarse classification of an error, independent of its context payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Io,
    Parse,
    Command,
    Other,
}

impl UserError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid argument error
    pub fn invalid(
        operation: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            operation,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a command error from a program invocation and its stderr
    pub fn command(
        command: impl Into<String>,
        args: &[String],
        stderr: impl Into<String>,
    ) -> Self {
        Self::Command {
            command: command.into(),
            args: args.to_vec(),
            stderr: stderr.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io { .. } | Self::ConfigDirCreate { .. } => ErrorKind::Io,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Command { .. } => ErrorKind::Command,
            _ => ErrorKind::Other,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotPrivileged(_) => Some("Re-run with sudo or as the root user"),
            Self::InvalidArgument { .. } => {
                Some("Names must match ^[a-z_][a-z0-9_]{0,30}$")
            }
            Self::Command { .. } => Some("Check that the shadow-utils tools are installed"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UserError::NotFound {
            resource: Resource::Users,
            key: "bob".to_string(),
        };
        assert_eq!(err.to_string(), "No such entry in users: bob");
    }

    #[test]
    fn command_error_carries_context() {
        let args = vec!["-m".to_string(), "bob".to_string()];
        let err = UserError::command("useradd", &args, "useradd: user 'bob' already exists");
        let msg = err.to_string();
        assert!(msg.contains("useradd"));
        assert!(msg.contains("bob"));
        assert!(msg.contains("already exists"));
        assert_eq!(err.kind(), ErrorKind::Command);
    }

    #[test]
    fn error_hint() {
        let err = UserError::NotPrivileged("linux-user".to_string());
        assert_eq!(err.hint(), Some("Re-run with sudo or as the root user"));
        assert_eq!(UserError::User("x".into()).hint(), None);
    }

    #[test]
    fn error_kind() {
        assert_eq!(
            UserError::invalid("add_user", "Root", "bad name").kind(),
            ErrorKind::InvalidArgument
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(UserError::io("reading /etc/passwd", io).kind(), ErrorKind::Io);
    }
}
