//! Account commands - create, delete and modify users and groups

use crate::cli::args::{MembershipArgs, NameArgs, PasswdArgs};
use crate::error::UserResult;
use crate::manager::IdentityManager;
use crate::ui::{self, UiContext};

/// Execute the add-user command
pub async fn add_user(args: NameArgs, manager: &IdentityManager) -> UserResult<()> {
    let user = manager.add_user(&args.name).await?;

    let ctx = UiContext::detect();
    ui::step_ok_detail(
        &ctx,
        &format!("Created user {}", user.username),
        &format!("uid {}, home {}", user.uid, user.home_dir),
    );
    Ok(())
}

/// Execute the remove-user command
pub async fn remove_user(args: NameArgs, manager: &IdentityManager) -> UserResult<()> {
    let output = manager.remove_user(&args.name).await?;
    print_tool_output(&output);

    ui::step_ok(&UiContext::detect(), &format!("Removed user {}", args.name));
    Ok(())
}

/// Execute the passwd command
pub async fn passwd(args: PasswdArgs, manager: &IdentityManager) -> UserResult<()> {
    let ctx = UiContext::detect();
    let password = if args.stdin {
        ui::read_stdin_line().await?
    } else {
        ui::password(&ctx, &format!("New password for {}", args.name)).await?
    };

    manager.set_password(&args.name, &password).await?;

    ui::step_ok(&ctx, &format!("Password updated for {}", args.name));
    Ok(())
}

/// Execute the add-group command
pub async fn add_group(args: NameArgs, manager: &IdentityManager) -> UserResult<()> {
    let group = manager.add_group(&args.name).await?;

    let ctx = UiContext::detect();
    ui::step_ok_detail(
        &ctx,
        &format!("Created group {}", group.groupname),
        &format!("gid {}", group.gid),
    );
    Ok(())
}

/// Execute the remove-group command
pub async fn remove_group(args: NameArgs, manager: &IdentityManager) -> UserResult<()> {
    let output = manager.remove_group(&args.name).await?;
    print_tool_output(&output);

    ui::step_ok(&UiContext::detect(), &format!("Removed group {}", args.name));
    Ok(())
}

/// Execute the add-to-group command
pub async fn add_to_group(args: MembershipArgs, manager: &IdentityManager) -> UserResult<()> {
    let output = manager.add_user_to_group(&args.user, &args.group).await?;
    print_tool_output(&output);

    ui::step_ok(
        &UiContext::detect(),
        &format!("Added {} to {}", args.user, args.group),
    );
    Ok(())
}

fn print_tool_output(output: &str) {
    let output = output.trim();
    if !output.is_empty() {
        println!("{}", output);
    }
}
