//! bandwidth-bench - run the messaging workload in a container and report
//! how many bytes it sent and received

use anyhow::{Context, Result};
use clap::Parser;

use bandwidth_bench::cli::Cli;
use bandwidth_bench::{run, write_report, DockerCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    bench_common::init_tracing("bandwidth_bench", cli.verbose)?;

    let file_config = cli.load_file_config().context("loading config")?;
    let settings = cli.resolve(file_config)?;

    tracing::info!(runtime = %settings.runtime, "starting bench run");

    let runtime =
        DockerCli::connect(settings.runtime).context("connecting to the docker engine")?;
    let mut stdout = std::io::stdout();

    let result = run(&runtime, &settings.plan, &mut stdout).await?;
    write_report(&mut stdout, result.as_ref())?;

    Ok(())
}
