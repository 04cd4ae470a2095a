//! Docker CLI runtime
//!
//! Drives the `docker` binary (or any CLI-compatible one such as `podman`)
//! through [`bench_common::cli`] for the image and container lifecycle.
//! Stats are read from the Engine API, see [`super::engine`].

use std::path::Path;

use async_trait::async_trait;
use bench_common::execute_cli;
use bollard::Docker;
use tracing::{info, instrument};

use super::engine::{self, EngineStats};
use super::{ContainerHandle, ContainerRuntime, ImageId, RuntimeError, RuntimeResult};

/// Binary used when none is configured
pub const DEFAULT_RUNTIME: &str = "docker";

/// Container runtime backed by the docker CLI and the Engine API
#[derive(Clone)]
pub struct DockerCli {
    program: String,
    engine: Docker,
}

impl DockerCli {
    pub fn new(program: impl Into<String>, engine: Docker) -> Self {
        Self {
            program: program.into(),
            engine,
        }
    }

    /// CLI at `program`, stats from the local daemon
    pub fn connect(program: impl Into<String>) -> RuntimeResult<Self> {
        Ok(Self::new(program, engine::connect_local()?))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Take the last non-empty line of a command's stdout as an identifier
fn last_line(operation: &'static str, stdout: &str) -> RuntimeResult<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
        .ok_or(RuntimeError::Malformed {
            operation,
            detail: "empty output".to_string(),
        })
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    type Stats = EngineStats;

    #[instrument(skip(self), fields(runtime = %self.program))]
    async fn build_image(&self, context: &Path) -> RuntimeResult<ImageId> {
        let context = context.to_string_lossy().into_owned();
        let stdout = execute_cli(&self.program, &["build", "-q", context.as_str()]).await?;
        let id = ImageId(last_line("build", &stdout)?);
        info!(image = %id, "image built");
        Ok(id)
    }

    #[instrument(skip(self), fields(runtime = %self.program))]
    async fn create_container(
        &self,
        image: &ImageId,
        command: &[String],
    ) -> RuntimeResult<ContainerHandle> {
        let mut args: Vec<&str> = vec!["create", image.0.as_str()];
        args.extend(command.iter().map(String::as_str));

        let stdout = execute_cli(&self.program, &args).await?;
        let handle = ContainerHandle {
            id: last_line("create", &stdout)?,
        };
        info!(container = %handle, "container created");
        Ok(handle)
    }

    #[instrument(skip(self), fields(runtime = %self.program))]
    async fn start_container(&self, container: &ContainerHandle) -> RuntimeResult<()> {
        execute_cli(&self.program, &["start", container.id.as_str()]).await?;
        info!(container = %container, "container started");
        Ok(())
    }

    fn stats_source(&self, container: &ContainerHandle) -> EngineStats {
        EngineStats::new(self.engine.clone(), container.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_line_picks_identifier() {
        assert_eq!(
            last_line("build", "warning: something\nsha256:abc\n\n").unwrap(),
            "sha256:abc"
        );
        assert!(last_line("create", "  \n").is_err());
    }

    #[test]
    fn test_stats_source_is_bound_to_container() {
        let engine =
            Docker::connect_with_http("http://127.0.0.1:2375", 1, bollard::API_DEFAULT_VERSION)
                .unwrap();
        let runtime = DockerCli::new("podman", engine);
        let handle = ContainerHandle {
            id: "c0ffee".to_string(),
        };

        assert_eq!(runtime.program(), "podman");
        assert_eq!(runtime.stats_source(&handle).container(), &handle);
    }
}
