//! List commands - show every user or group

use crate::cli::args::{ListArgs, OutputFormat};
use crate::directory::{GroupRecord, UserRecord};
use crate::error::UserResult;
use crate::manager::IdentityManager;
use console::style;

/// Execute the users command
pub async fn users(args: ListArgs, manager: &IdentityManager) -> UserResult<()> {
    let users = manager.get_users().await?;

    match args.format {
        OutputFormat::Table => print_user_table(&users),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*users)?),
        OutputFormat::Plain => {
            for user in users.iter() {
                println!("{}", user.username);
            }
        }
    }

    Ok(())
}

/// Execute the groups command
pub async fn groups(args: ListArgs, manager: &IdentityManager) -> UserResult<()> {
    let groups = manager.get_groups().await?;
    print_groups(&groups, args.format)
}

pub(crate) fn print_user_table(users: &[UserRecord]) {
    println!(
        "{:<20} {:>6} {:>6} {:<24} {:<20} {}",
        style("USERNAME").bold(),
        style("UID").bold(),
        style("GID").bold(),
        style("HOME").bold(),
        style("SHELL").bold(),
        style("NAME").bold()
    );

    for user in users {
        println!(
            "{:<20} {:>6} {:>6} {:<24} {:<20} {}",
            user.username,
            user.uid,
            user.gid,
            user.home_dir,
            user.shell,
            user.full_name.as_deref().unwrap_or("")
        );
    }
}

pub(crate) fn print_groups(groups: &[GroupRecord], format: OutputFormat) -> UserResult<()> {
    match format {
        OutputFormat::Table => {
            println!(
                "{:<20} {:>6} {}",
                style("GROUP").bold(),
                style("GID").bold(),
                style("MEMBERS").bold()
            );
            for group in groups {
                println!(
                    "{:<20} {:>6} {}",
                    group.groupname,
                    group.gid,
                    group.members.join(",")
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(groups)?),
        OutputFormat::Plain => {
            for group in groups {
                println!("{}", group.groupname);
            }
        }
    }

    Ok(())
}
