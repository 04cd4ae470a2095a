//! Bench run sequence
//!
//! build image -> create container -> echo command -> start -> monitor.

use std::io::Write;
use std::path::PathBuf;

use tracing::{info, instrument};

use crate::error::BenchResult;
use crate::monitor::TrafficMonitor;
use crate::runtime::stats::StatsSnapshot;
use crate::runtime::ContainerRuntime;
use crate::workload::WorkloadEnv;

/// Everything needed for one bench run
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub workload: WorkloadEnv,
    /// Image build context directory
    pub context: PathBuf,
    /// Command started inside the container after the env assignments
    pub command: String,
    pub monitor: TrafficMonitor,
}

impl RunPlan {
    pub fn command_line(&self) -> String {
        self.workload.command_line(&self.command)
    }
}

/// Launch the workload and watch its traffic
///
/// Writes `COMMAND: <command line>` to `out` before starting the container and
/// returns the traffic monitor's result.
#[instrument(skip_all, fields(context = %plan.context.display()))]
pub async fn run<R, W>(runtime: &R, plan: &RunPlan, out: &mut W) -> BenchResult<Option<StatsSnapshot>>
where
    R: ContainerRuntime,
    W: Write,
{
    let image = runtime.build_image(&plan.context).await?;

    let argv = plan.workload.command_argv(&plan.command);
    let container = runtime.create_container(&image, &argv).await?;

    writeln!(out, "COMMAND: {}", plan.command_line())?;
    out.flush()?;

    runtime.start_container(&container).await?;

    let source = runtime.stats_source(&container);
    let result = plan.monitor.observe_until_idle(&source).await?;

    info!(
        container = %container,
        tx_bytes = ?result.as_ref().and_then(|s| s.tx_bytes()),
        rx_bytes = ?result.as_ref().and_then(|s| s.rx_bytes()),
        "run finished"
    );
    Ok(result)
}
