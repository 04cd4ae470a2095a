//! Async executor for external CLI commands
//!
//! Thin wrapper around `tokio::process::Command` used to drive the container
//! runtime binary. Every call captures stdout/stderr, maps a missing binary to
//! [`CliError::NotFound`] and a non-zero exit to [`CliError::CommandFailed`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bench_common::cli::execute_cli;
//!
//! let container = execute_cli("docker", &["create", "sha256:abc", "./run.sh"]).await?;
//! ```

use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::error::{CliError, CliResult};

async fn run(program: &str, args: &[&str]) -> CliResult<Output> {
    debug!("executing: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CliError::NotFound(program.to_string())
            } else {
                CliError::SpawnError {
                    program: program.to_string(),
                    source: e,
                }
            }
        })?
        .wait_with_output()
        .await
        .map_err(|e| CliError::SpawnError {
            program: program.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);

        error!(code, stderr = %stderr, "{} command failed", program);
        return Err(CliError::CommandFailed {
            program: program.to_string(),
            code,
            stderr,
        });
    }

    Ok(output)
}

/// Execute a command and return its trimmed stdout
///
/// Used for commands like `docker build -q` or `docker create` that print a
/// single identifier.
///
/// # Errors
///
/// Returns an error if:
/// - The binary is not found or fails to spawn
/// - The command exits with non-zero status
#[instrument(fields(cmd = %args.join(" ")))]
pub async fn execute_cli(program: &str, args: &[&str]) -> CliResult<String> {
    let output = run(program, args).await?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
