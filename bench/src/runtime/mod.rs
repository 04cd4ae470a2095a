//! Container runtime seam
//!
//! The bench only needs four things from a runtime: build an image, create a
//! container, start it, and read its stats. These live behind traits so the
//! polling core and the launch sequence can run against a fake in tests.

pub mod docker;
pub mod engine;
pub mod error;
pub mod stats;

use std::fmt;
use std::path::Path;

use async_trait::async_trait;

pub use error::{RuntimeError, RuntimeResult};
use stats::StatsSnapshot;

/// Identifier of a built image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageId(pub String);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a created container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Something that can produce a stats snapshot on demand
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Query the current cumulative counters
    async fn stats(&self) -> RuntimeResult<StatsSnapshot>;
}

/// Container runtime operations used by the launch sequence
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    type Stats: StatsSource;

    /// Build an image from a context directory
    async fn build_image(&self, context: &Path) -> RuntimeResult<ImageId>;

    /// Create (but do not start) a container running `command`
    async fn create_container(
        &self,
        image: &ImageId,
        command: &[String],
    ) -> RuntimeResult<ContainerHandle>;

    /// Start a created container
    async fn start_container(&self, container: &ContainerHandle) -> RuntimeResult<()>;

    /// Stats source bound to one container
    fn stats_source(&self, container: &ContainerHandle) -> Self::Stats;
}
