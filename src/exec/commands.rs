//! Builders for the account-management command lines

use crate::config::schema::CommandsConfig;
use crate::exec::CommandSpec;
use crate::validate::ValidName;

/// Program names and fixed options for each account operation
#[derive(Debug, Clone)]
pub struct CommandTable {
    config: CommandsConfig,
}

impl CommandTable {
    /// Build a table from configuration
    pub fn new(config: CommandsConfig) -> Self {
        Self { config }
    }

    /// Whether a failing password tool should fail the operation
    pub fn check_password_exit(&self) -> bool {
        self.config.check_password_exit
    }

    /// Create an account with a home directory and no login shell
    pub fn create_account(&self, user: &ValidName) -> CommandSpec {
        CommandSpec::new(
            &self.config.useradd,
            ["-m", "-s", self.config.login_shell.as_str(), user.as_str()],
        )
    }

    /// Delete an account and its home directory
    pub fn delete_account(&self, user: &ValidName) -> CommandSpec {
        CommandSpec::new(&self.config.userdel, ["-r", "-f", user.as_str()])
    }

    pub fn create_group(&self, group: &ValidName) -> CommandSpec {
        CommandSpec::new(&self.config.groupadd, [group.as_str()])
    }

    pub fn delete_group(&self, group: &ValidName) -> CommandSpec {
        CommandSpec::new(&self.config.groupdel, [group.as_str()])
    }

    /// Append `user` to the supplementary group `group`
    pub fn add_member(&self, group: &ValidName, user: &ValidName) -> CommandSpec {
        CommandSpec::new(
            &self.config.usermod,
            ["-a", "-G", group.as_str(), user.as_str()],
        )
    }

    /// Password tool; the password itself goes to stdin
    pub fn set_password(&self, user: &ValidName) -> CommandSpec {
        CommandSpec::new(&self.config.passwd, [user.as_str()])
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new(CommandsConfig::default())
    }
}
