//! Tracing initialization
//!
//! Logs go to stderr so stdout stays reserved for the command echo and the
//! traffic report.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to a log level (default is warn)
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize tracing/logging
///
/// Sets up logging to stderr with:
/// - Formatted output without ANSI colors
/// - Environment-based filtering via RUST_LOG
/// - A default level for `crate_name` derived from the `-v` count
///
/// Set `LOG_FORMAT=json` for structured JSON output.
///
/// # Arguments
///
/// * `crate_name` - Target to apply the verbosity to (e.g., "bandwidth_bench")
/// * `verbose` - Number of `-v` flags given on the command line
pub fn init_tracing(crate_name: &str, verbose: u8) -> anyhow::Result<()> {
    let level = level_for_verbosity(verbose);
    let directive = format!("{}={}", crate_name, level.as_str().to_lowercase());
    let filter = EnvFilter::from_default_env()
        .add_directive(directive.parse()?)
        .add_directive(format!("bench_common={}", level.as_str().to_lowercase()).parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
