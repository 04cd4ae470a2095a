//! Error types for the bench

use std::path::PathBuf;

use thiserror::Error;

use crate::runtime::RuntimeError;
use crate::runtime::stats::StatsSnapshot;

/// Invalid workload parameters
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkloadError {
    #[error("applications must be at least 1")]
    ZeroApplications,

    #[error("invalid public chat id {0:?}: must be non-empty without whitespace, '=' or quotes")]
    InvalidChatId(String),
}

/// Config file and settings errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Ways the traffic monitor can stop without reaching idle
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The runtime could not produce a stats snapshot
    #[error("stats query failed: {0}")]
    Query(#[from] RuntimeError),

    /// Traffic was still active when the configured poll bound was hit
    #[error("traffic still active after {polls} polls")]
    PollLimit {
        polls: u32,
        last: Option<StatsSnapshot>,
    },
}

/// Top-level error for a bench run
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("workload error: {0}")]
    Workload(#[from] WorkloadError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bench operations
pub type BenchResult<T> = Result<T, BenchError>;
