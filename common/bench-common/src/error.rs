//! Error types for external CLI operations
//!
//! A missing binary is reported separately from a spawn failure so callers
//! can tell an unconfigured runtime from a broken one.

use thiserror::Error;

/// Errors that can occur when executing an external CLI
#[derive(Error, Debug)]
pub enum CliError {
    /// The command exited with a non-zero status code
    #[error("{program} command failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// Binary that was invoked
        program: String,
        /// Exit code from the process (-1 when killed by a signal)
        code: i32,
        /// Standard error output
        stderr: String,
    },

    /// Failed to spawn the process
    #[error("failed to spawn {program} process: {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Binary is not installed or not in PATH
    #[error("{0} not found - ensure it is installed and in PATH")]
    NotFound(String),
}

impl CliError {
    /// Name of the binary this error came from
    pub fn program(&self) -> &str {
        match self {
            CliError::CommandFailed { program, .. }
            | CliError::SpawnError { program, .. } => program,
            CliError::NotFound(program) => program,
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
