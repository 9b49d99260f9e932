//! Terminal output and prompts for the linux-user binary
//!
//! Uses `cliclack` in an interactive terminal and plain lines otherwise.

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{step_ok, step_ok_detail, step_warn_hint};
pub use prompts::{password, read_stdin_line};
