//! Child-process execution for external media tools.
//!
//! Runs a tool with a timeout, captures its output, and maps failures
//! into [`ToolError`].

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use glossvideo_core::traits::media::ToolError;

/// Captured output of a successful tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Wall-clock duration.
    pub duration_ms: u64,
}

/// Runs one external program with a fixed timeout.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    program: String,
    timeout: Duration,
}

impl ToolExecutor {
    /// Create an executor for `program`.
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// The program being run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program with `args` and wait for it to finish.
    pub async fn run(&self, args: &[String]) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        tracing::debug!(program = %self.program, ?args, "Running media tool");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if !output.status.success() {
                    let code = output.status.code().unwrap_or(-1);
                    tracing::error!(
                        program = %self.program,
                        code,
                        stderr = %stderr.chars().take(500).collect::<String>(),
                        "Media tool failed"
                    );
                    return Err(ToolError::ProcessFailed {
                        code,
                        stderr: stderr.chars().take(2000).collect(),
                    });
                }

                tracing::debug!(program = %self.program, duration_ms, "Media tool completed");
                Ok(ToolOutput {
                    stdout,
                    stderr,
                    duration_ms,
                })
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ToolError::CommandNotFound(self.program.clone()))
            }
            Ok(Err(e)) => Err(ToolError::Io(e)),
            Err(_) => {
                tracing::error!(
                    program = %self.program,
                    timeout_seconds = self.timeout.as_secs(),
                    "Media tool timed out"
                );
                Err(ToolError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
