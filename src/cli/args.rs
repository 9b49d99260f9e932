//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// linux-user - manage Linux users and groups
///
/// Reads the system account and group files and drives the shadow-utils
/// tools for every change.
#[derive(Parser, Debug)]
#[command(name = "linux-user")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LINUX_USER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all users
    Users(ListArgs),

    /// Show one user
    User(ShowArgs),

    /// List all groups
    Groups(ListArgs),

    /// Show one group
    Group(ShowArgs),

    /// List the groups a user belongs to
    UserGroups(ShowArgs),

    /// Create a user with a home directory and no login shell
    AddUser(NameArgs),

    /// Delete a user and their home directory
    RemoveUser(NameArgs),

    /// Set a user's password
    Passwd(PasswdArgs),

    /// Create a group
    AddGroup(NameArgs),

    /// Delete a group
    RemoveGroup(NameArgs),

    /// Add a user to a supplementary group
    AddToGroup(MembershipArgs),

    /// Check whether a name is a valid user or group name
    Validate(NameArgs),

    /// Show configuration
    Config(ConfigArgs),
}

impl Commands {
    /// Whether the command changes the account files
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Commands::AddUser(_)
                | Commands::RemoveUser(_)
                | Commands::Passwd(_)
                | Commands::AddGroup(_)
                | Commands::RemoveGroup(_)
                | Commands::AddToGroup(_)
        )
    }
}

/// Output format for listing commands
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for listing commands
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for commands that show one entry
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// User or group name
    pub name: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for commands that take a single name
#[derive(Parser, Debug)]
pub struct NameArgs {
    /// User or group name
    pub name: String,
}

/// Arguments for the passwd command
#[derive(Parser, Debug)]
pub struct PasswdArgs {
    /// User name
    pub name: String,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the add-to-group command
#[derive(Parser, Debug)]
pub struct MembershipArgs {
    /// User name
    pub user: String,

    /// Group name
    pub group: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
