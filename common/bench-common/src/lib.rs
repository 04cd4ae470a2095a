//! Bench Common - Shared utilities for the bandwidth bench
//!
//! This crate provides the ambient pieces the bench binary builds on:
//!
//! - **Initialization**: [`init_tracing`] for stderr logging with verbosity control
//! - **CLI execution**: async wrappers around external binaries (the container
//!   runtime CLI) with typed errors
//!
//! # Example
//!
//! ```rust,ignore
//! use bench_common::{execute_cli, init_tracing};
//!
//! init_tracing("bandwidth_bench", 1)?;
//! let id = execute_cli("docker", &["build", "-q", "."]).await?;
//! ```

pub mod cli;
pub mod error;
pub mod init;

// Re-export commonly used items at crate root
pub use cli::execute_cli;
pub use error::{CliError, CliResult};
pub use init::{init_tracing, level_for_verbosity};
