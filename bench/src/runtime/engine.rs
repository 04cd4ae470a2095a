//! Docker Engine stats
//!
//! Network counters come from the Engine API stats endpoint
//! (`GET /containers/{id}/stats?stream=false&one-shot=true`) through
//! `bollard`. The CLI only prints these counters rounded to a few
//! significant digits, so stats skip it and ask the daemon directly.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{NetworkStats, Stats, StatsOptions};
use bollard::Docker;
use futures_util::TryStreamExt;
use tracing::{debug, instrument};

use super::stats::{NetworkCounters, StatsSnapshot};
use super::{ContainerHandle, RuntimeError, RuntimeResult, StatsSource};

/// Client for the local daemon (`DOCKER_HOST` or the default socket)
///
/// No request is made until the first stats query.
pub fn connect_local() -> RuntimeResult<Docker> {
    Ok(Docker::connect_with_local_defaults()?)
}

/// Stats source for a single container via the Engine API
#[derive(Clone)]
pub struct EngineStats {
    client: Docker,
    container: ContainerHandle,
}

impl EngineStats {
    pub fn new(client: Docker, container: ContainerHandle) -> Self {
        Self { client, container }
    }

    pub fn container(&self) -> &ContainerHandle {
        &self.container
    }
}

#[async_trait]
impl StatsSource for EngineStats {
    #[instrument(skip(self), fields(container = %self.container))]
    async fn stats(&self) -> RuntimeResult<StatsSnapshot> {
        let options = StatsOptions {
            stream: false,
            one_shot: true,
        };
        let mut stream = Box::pin(self.client.stats(&self.container.id, Some(options)));

        let stats = stream
            .try_next()
            .await?
            .ok_or_else(|| RuntimeError::Malformed {
                operation: "stats",
                detail: format!("no stats returned for container {}", self.container),
            })?;
        debug!(
            interfaces = stats.networks.as_ref().map_or(0, HashMap::len),
            "engine stats"
        );

        Ok(snapshot_from_engine(&stats))
    }
}

/// Convert one Engine stats document into a snapshot
pub fn snapshot_from_engine(stats: &Stats) -> StatsSnapshot {
    StatsSnapshot {
        container: (!stats.id.is_empty()).then(|| stats.id.clone()),
        network: network_counters(stats.networks.as_ref()),
    }
}

/// Sum the counters of every interface
///
/// A stopped container reports no interfaces; that is `None`, the same as a
/// runtime without network data.
pub fn network_counters(
    networks: Option<&HashMap<String, NetworkStats>>,
) -> Option<NetworkCounters> {
    let networks = networks.filter(|n| !n.is_empty())?;

    let total = networks.values().fold(
        NetworkCounters {
            tx_bytes: 0,
            rx_bytes: 0,
        },
        |acc, iface| NetworkCounters {
            tx_bytes: acc.tx_bytes.saturating_add(iface.tx_bytes),
            rx_bytes: acc.rx_bytes.saturating_add(iface.rx_bytes),
        },
    );
    Some(total)
}
