//! Show commands - display a single user or group

use crate::cli::args::{OutputFormat, ShowArgs};
use crate::cli::commands::list::{print_groups, print_user_table};
use crate::directory::Resource;
use crate::error::{UserError, UserResult};
use crate::manager::IdentityManager;

/// Execute the user command
pub async fn user(args: ShowArgs, manager: &IdentityManager) -> UserResult<()> {
    let user = manager.get_user_info(&args.name).await?;

    match args.format {
        OutputFormat::Table => print_user_table(std::slice::from_ref(&user)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
        OutputFormat::Plain => println!("{}", user.username),
    }

    Ok(())
}

/// Execute the group command
pub async fn group(args: ShowArgs, manager: &IdentityManager) -> UserResult<()> {
    let group = manager
        .get_group_info(&args.name)
        .await?
        .ok_or_else(|| UserError::NotFound {
            resource: Resource::Groups,
            key: args.name.clone(),
        })?;

    print_groups(std::slice::from_ref(&group), args.format)
}

/// Execute the user-groups command
pub async fn user_groups(args: ShowArgs, manager: &IdentityManager) -> UserResult<()> {
    let groups = manager.groups_of_user(&args.name).await?;
    print_groups(&groups, args.format)
}
