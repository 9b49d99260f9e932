//! Validate command - check a candidate name without touching the system

use crate::cli::args::NameArgs;
use crate::error::{UserError, UserResult};
use crate::ui::{self, UiContext};
use crate::validate::validate_name;

/// Execute the validate command
pub fn execute(args: NameArgs) -> UserResult<()> {
    if validate_name(&args.name) {
        ui::step_ok(&UiContext::detect(), &format!("{} is a valid name", args.name));
        Ok(())
    } else {
        Err(UserError::invalid(
            "validate",
            args.name,
            "not a portable user or group name",
        ))
    }
}
