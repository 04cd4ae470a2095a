//! Error types for container runtime operations

use bench_common::CliError;
use thiserror::Error;

/// Errors that can occur when talking to the container runtime
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The runtime binary failed (missing, non-zero exit, bad JSON)
    #[error(transparent)]
    Cli(#[from] CliError),

    /// The Engine API request failed (daemon unreachable, unknown container)
    #[error("docker engine request failed: {0}")]
    Engine(#[from] bollard::errors::Error),

    /// The runtime answered but the output was not usable
    #[error("unexpected output from {operation}: {detail}")]
    Malformed {
        operation: &'static str,
        detail: String,
    },
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
