//! Bandwidth Bench Library
//!
//! Launches a containerized messaging workload with parameters passed as
//! environment variables, then watches the container's network counters
//! until outbound traffic stops and reports the bytes sent and received.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use bandwidth_bench::{run, DockerCli, RunPlan, TrafficMonitor, WorkloadEnv, WorkloadSpec};
//!
//! let plan = RunPlan {
//!     workload: WorkloadEnv::new(WorkloadSpec { messages: 10, ..Default::default() })?,
//!     context: ".".into(),
//!     command: "./run.sh".to_string(),
//!     monitor: TrafficMonitor::default(),
//! };
//! let runtime = DockerCli::connect("docker")?;
//! let result = run(&runtime, &plan, &mut std::io::stdout()).await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod monitor;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod workload;

pub use error::{BenchError, BenchResult, ConfigError, MonitorError, WorkloadError};
pub use monitor::{MonitorState, TrafficMonitor, DEFAULT_POLL_INTERVAL};
pub use report::{format_report, write_report};
pub use runner::{run, RunPlan};
pub use runtime::docker::DockerCli;
pub use runtime::engine::EngineStats;
pub use runtime::stats::{NetworkCounters, StatsSnapshot};
pub use runtime::{ContainerHandle, ContainerRuntime, ImageId, RuntimeError, StatsSource};
pub use workload::{WorkloadEnv, WorkloadSpec};
