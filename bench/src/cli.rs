//! CLI argument definitions
//!
//! Flags are merged with the optional config file into a [`Settings`] value:
//! command line first, then `.bench.toml`, then built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::FileConfig;
use crate::error::{BenchResult, ConfigError};
use crate::monitor::{TrafficMonitor, DEFAULT_POLL_INTERVAL};
use crate::runner::RunPlan;
use crate::runtime::docker::DEFAULT_RUNTIME;
use crate::workload::{WorkloadEnv, WorkloadSpec, DEFAULT_PUBLIC_CHAT_ID};

/// Default image build context
pub const DEFAULT_CONTEXT: &str = ".";

/// Default command run inside the container
pub const DEFAULT_COMMAND: &str = "./run.sh";

#[derive(Parser, Debug)]
#[command(name = "bandwidth-bench")]
#[command(about = "Run the messaging workload in a container and report its network traffic")]
pub struct Cli {
    /// Number of messages to send (0 = no limit)
    #[arg(short = 'm', long, default_value_t = 0)]
    pub messages: u32,

    /// Number of seconds to run (0 = no limit)
    #[arg(short = 's', long, default_value_t = 0)]
    pub seconds: u32,

    /// Number of simulated applications (ids id1..idN)
    #[arg(short = 'a', long, default_value_t = 1)]
    pub applications: u32,

    /// Enable datasync
    #[arg(short = 'd', long)]
    pub datasync: bool,

    /// Enable the generic discovery topic
    #[arg(short = 'g', long)]
    pub discovery: bool,

    /// Publish to a public chat (defaults to "test200" when given without a value)
    #[arg(short = 'p', long, num_args = 0..=1, default_missing_value = DEFAULT_PUBLIC_CHAT_ID)]
    pub public_chat_id: Option<String>,

    /// Image build context directory (default: ".")
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Command to start inside the container (default: "./run.sh")
    #[arg(long)]
    pub command: Option<String>,

    /// Container runtime binary (default: "docker")
    #[arg(long, env = "BENCH_RUNTIME")]
    pub runtime: Option<String>,

    /// Delay between stats queries in milliseconds (default: 300)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Give up after this many polls with traffic still active (default: no limit)
    #[arg(long)]
    pub max_polls: Option<u32>,

    /// Config file (default: search for .bench.toml upward from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Container runtime binary
    pub runtime: String,
    pub plan: RunPlan,
}

impl Cli {
    /// Read the config file named by `--config`, or search for one
    pub fn load_file_config(&self) -> Result<FileConfig, ConfigError> {
        match &self.config {
            Some(path) => FileConfig::load_from_path(path),
            None => Ok(FileConfig::load()?.unwrap_or_default()),
        }
    }

    /// Merge flags with `file` and validate the result
    pub fn resolve(self, file: FileConfig) -> BenchResult<Settings> {
        let workload = WorkloadEnv::new(WorkloadSpec {
            messages: self.messages,
            seconds: self.seconds,
            applications: self.applications,
            datasync: self.datasync,
            discovery: self.discovery,
            public_chat_id: self.public_chat_id,
        })?;

        let runtime = self
            .runtime
            .or(file.runtime.binary)
            .unwrap_or_else(|| DEFAULT_RUNTIME.to_string());
        if runtime.trim().is_empty() {
            return Err(ConfigError::Invalid("runtime binary must not be empty".to_string()).into());
        }

        let command = self
            .command
            .or(file.runtime.command)
            .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
        if command.trim().is_empty() {
            return Err(ConfigError::Invalid("command must not be empty".to_string()).into());
        }

        let context = self
            .context
            .or(file.runtime.context)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTEXT));

        let interval = match self.interval_ms.or(file.monitor.interval_ms) {
            Some(0) => {
                return Err(ConfigError::Invalid("interval_ms must be greater than 0".to_string()).into())
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_POLL_INTERVAL,
        };

        let max_polls = self.max_polls.or(file.monitor.max_polls);
        if max_polls == Some(0) {
            return Err(ConfigError::Invalid("max_polls must be greater than 0".to_string()).into());
        }

        Ok(Settings {
            runtime,
            plan: RunPlan {
                workload,
                context,
                command,
                monitor: TrafficMonitor::new(interval).with_max_polls(max_polls),
            },
        })
    }
}
