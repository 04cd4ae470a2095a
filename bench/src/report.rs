//! Traffic report output

use std::io::Write;

use crate::runtime::stats::StatsSnapshot;

/// Summary lines for a monitor result
///
/// Empty when there is no result or the result carries no network data.
pub fn format_report(result: Option<&StatsSnapshot>) -> Vec<String> {
    match result.and_then(|s| s.network) {
        Some(net) => vec![
            format!("SENT: {} bytes", net.tx_bytes),
            format!("RECEIVED: {} bytes", net.rx_bytes),
        ],
        None => Vec::new(),
    }
}

pub fn write_report<W: Write>(out: &mut W, result: Option<&StatsSnapshot>) -> std::io::Result<()> {
    for line in format_report(result) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
