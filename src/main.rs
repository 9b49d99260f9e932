//! linux-user - Linux user and group management
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use linux_user::cli::{commands, Cli, Commands};
use linux_user::config::ConfigManager;
use linux_user::error::UserResult;
use linux_user::preflight;
use linux_user::IdentityManager;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> UserResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("linux_user=warn"),
        1 => EnvFilter::new("linux_user=info"),
        _ => EnvFilter::new("linux_user=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        // Validation never touches the system
        Commands::Validate(args) => commands::validate(args),
        command => execute(command, cli.config).await,
    }
}

async fn execute(command: Commands, config_path: Option<PathBuf>) -> UserResult<()> {
    preflight::require_linux()?;
    if command.is_mutation() {
        preflight::require_root("linux-user")?;
    }

    let config_manager = match config_path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;
    debug!("Loaded configuration from {}", config_manager.path().display());

    let manager = IdentityManager::from_config(&config);

    match command {
        Commands::Validate(args) => commands::validate(args),
        Commands::Users(args) => commands::users(args, &manager).await,
        Commands::User(args) => commands::user(args, &manager).await,
        Commands::Groups(args) => commands::groups(args, &manager).await,
        Commands::Group(args) => commands::group(args, &manager).await,
        Commands::UserGroups(args) => commands::user_groups(args, &manager).await,
        Commands::AddUser(args) => commands::add_user(args, &manager).await,
        Commands::RemoveUser(args) => commands::remove_user(args, &manager).await,
        Commands::Passwd(args) => commands::passwd(args, &manager).await,
        Commands::AddGroup(args) => commands::add_group(args, &manager).await,
        Commands::RemoveGroup(args) => commands::remove_group(args, &manager).await,
        Commands::AddToGroup(args) => commands::add_to_group(args, &manager).await,
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
    }
}
