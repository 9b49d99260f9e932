//! Interactive prompts with a piped-input fallback

use super::context::UiContext;
use crate::error::{UserError, UserResult};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Ask for a password
///
/// Prompts with masked input in a terminal; otherwise reads one line from
/// stdin.
pub async fn password(ctx: &UiContext, message: &str) -> UserResult<String> {
    if !ctx.is_interactive() {
        return read_stdin_line().await;
    }

    // Run blocking cliclack prompt in spawn_blocking
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::password(&message).mask('*').interact()
    })
    .await
    .map_err(|e| UserError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| UserError::User(format!("Prompt failed: {}", e)))
}

/// Read the first line of stdin, without its line ending
pub async fn read_stdin_line() -> UserResult<String> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| UserError::io("reading password from stdin", e))?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
