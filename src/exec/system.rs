//! Command runner backed by real processes

use crate::error::{UserError, UserResult};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec, ExitSignal};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Runs commands with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> UserResult<CommandOutput> {
        debug!("Executing: {} {:?}", command.program, command.args);

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| UserError::command(&command.program, &command.args, e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            let stderr = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            Err(UserError::command(&command.program, &command.args, stderr))
        }
    }

    async fn run_with_stdin(
        &self,
        command: &CommandSpec,
        payload: &str,
    ) -> UserResult<ExitSignal> {
        debug!("Executing interactively: {} {:?}", command.program, command.args);

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| UserError::command(&command.program, &command.args, e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload.as_bytes()).await {
                Ok(()) => {}
                // The process closed its input early; its exit status still decides
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("{} closed stdin before reading input", command.program);
                }
                Err(e) => {
                    return Err(UserError::io(
                        format!("writing stdin of {}", command.program),
                        e,
                    ))
                }
            }
            // Dropping the handle closes the pipe
            drop(stdin);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| UserError::io(format!("waiting for {}", command.program), e))?;

        Ok(ExitSignal {
            code: status.code(),
        })
    }
}
