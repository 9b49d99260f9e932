//! Configuration schema for linux-user
//!
//! Configuration is stored at `~/.config/linux-user/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Identity file locations and cache behavior
    pub directory: DirectoryConfig,

    /// External account tools
    pub commands: CommandsConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging of mutations
    pub audit_log: bool,

    /// Audit log location (defaults to the state directory)
    pub audit_log_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_log_path: None,
        }
    }
}

/// Identity file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Account file
    pub passwd_path: PathBuf,

    /// Group file
    pub group_path: PathBuf,

    /// Share one file read between concurrent cache misses
    pub single_flight: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            passwd_path: PathBuf::from("/etc/passwd"),
            group_path: PathBuf::from("/etc/group"),
            single_flight: true,
        }
    }
}

/// External command settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Account creation tool
    pub useradd: String,

    /// Account deletion tool
    pub userdel: String,

    /// Group creation tool
    pub groupadd: String,

    /// Group deletion tool
    pub groupdel: String,

    /// Tool that adds an account to a supplementary group
    pub usermod: String,

    /// Password tool, fed the password on stdin
    pub passwd: String,

    /// Login shell given to new accounts
    pub login_shell: String,

    /// Treat a non-zero exit of the password tool as a failure
    pub check_password_exit: bool,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            useradd: "useradd".to_string(),
            userdel: "userdel".to_string(),
            groupadd: "groupadd".to_string(),
            groupdel: "groupdel".to_string(),
            usermod: "usermod".to_string(),
            passwd: "passwd".to_string(),
            login_shell: "/usr/sbin/nologin".to_string(),
            check_password_exit: true,
        }
    }
}

impl Config {
    /// Check settings that would only fail later, at command time
    pub fn check(&self) -> Result<(), String> {
        for (key, path) in [
            ("directory.passwd_path", &self.directory.passwd_path),
            ("directory.group_path", &self.directory.group_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(format!("{} must not be empty", key));
            }
        }

        let commands = &self.commands;
        for (key, program) in [
            ("useradd", &commands.useradd),
            ("userdel", &commands.userdel),
            ("groupadd", &commands.groupadd),
            ("groupdel", &commands.groupdel),
            ("usermod", &commands.usermod),
            ("passwd", &commands.passwd),
        ] {
            if program.trim().is_empty() {
                return Err(format!("commands.{} must name a program", key));
            }
        }

        if !commands.login_shell.starts_with('/') {
            return Err(format!(
                "commands.login_shell must be an absolute path, got '{}'",
                commands.login_shell
            ));
        }

        Ok(())
    }
}
