//! Stats snapshot types

use serde::{Deserialize, Serialize};

/// Cumulative network counters since container start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCounters {
    /// Total bytes transmitted
    pub tx_bytes: u64,
    /// Total bytes received
    pub rx_bytes: u64,
}

/// One point-in-time read of a container's stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Container id or name as reported by the runtime
    pub container: Option<String>,
    /// Network counters, `None` when the runtime reported no network data
    pub network: Option<NetworkCounters>,
}

impl StatsSnapshot {
    /// Snapshot carrying only network counters
    pub fn with_network(tx_bytes: u64, rx_bytes: u64) -> Self {
        Self {
            network: Some(NetworkCounters { tx_bytes, rx_bytes }),
            ..Default::default()
        }
    }

    /// Snapshot with no network section
    pub fn without_network() -> Self {
        Self::default()
    }

    pub fn tx_bytes(&self) -> Option<u64> {
        self.network.map(|n| n.tx_bytes)
    }

    pub fn rx_bytes(&self) -> Option<u64> {
        self.network.map(|n| n.rx_bytes)
    }

    /// True when network data is present and the transmit counter is non-zero
    pub fn is_transmitting(&self) -> bool {
        matches!(self.network, Some(n) if n.tx_bytes != 0)
    }
}
