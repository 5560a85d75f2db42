//! Registry tool abstraction and the docker CLI implementation

use crate::types::ImageReference;
use async_trait::async_trait;
use retag_core::{Error, MutationOp, Result, Settings};
use std::path::PathBuf;
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace, warn};

/// Container registry operations the workflows depend on
///
/// Implementations block until the underlying operation finishes. Pull,
/// tag and push stream their progress straight to the terminal.
#[async_trait]
pub trait RegistryTool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Fetch the raw manifest JSON for an image
    async fn inspect_manifest(&self, image: &ImageReference) -> Result<String>;

    /// Pull an image into the local store
    async fn pull(&self, image: &ImageReference) -> Result<()>;

    /// Point `target` at the local image `source`
    async fn tag(&self, source: &ImageReference, target: &ImageReference) -> Result<()>;

    /// Push a local tag to the registry
    async fn push(&self, image: &ImageReference) -> Result<()>;
}

/// [`RegistryTool`] backed by the `docker` CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
    timeout: Duration,
}

impl DockerCli {
    /// Locate the docker binary and bound every invocation by `timeout`
    ///
    /// # Errors
    /// Returns an error if the binary is not found in PATH
    pub fn new(binary: &str, timeout: Duration) -> Result<Self> {
        let binary = which::which(binary).map_err(|_| Error::tool_not_found(binary))?;
        debug!("Found docker at: {:?}", binary);
        Ok(Self { binary, timeout })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.docker_binary,
            Duration::from_secs(settings.command_timeout_secs),
        )
    }

    fn describe(args: &[&str]) -> String {
        format!("docker {}", args.join(" "))
    }

    /// Run with stdout/stderr captured
    async fn capture(&self, args: &[&str]) -> Result<Output> {
        let command = Self::describe(args);
        debug!("Running: {}", command);

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(Error::timeout(command, self.timeout.as_secs())),
        }
    }

    /// Run with stdout/stderr inherited from this process
    async fn stream(&self, args: &[&str]) -> Result<ExitStatus> {
        let command = Self::describe(args);
        debug!("Running: {}", command);

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => Ok(status?),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed out command '{}': {}", command, e);
                }
                Err(Error::timeout(command, self.timeout.as_secs()))
            }
        }
    }

    async fn mutate(
        &self,
        op: MutationOp,
        reference: &ImageReference,
        args: &[&str],
    ) -> Result<()> {
        let status = self.stream(args).await.map_err(|e| match e {
            Error::Io(io) => Error::mutation(op, reference.to_string(), io.to_string()),
            other => other,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::mutation(
                op,
                reference.to_string(),
                format!("docker exited with {}", status),
            ))
        }
    }
}

#[async_trait]
impl RegistryTool for DockerCli {
    fn name(&self) -> &str {
        "docker"
    }

    async fn inspect_manifest(&self, image: &ImageReference) -> Result<String> {
        let reference = image.to_string();
        let output = self
            .capture(&["manifest", "inspect", &reference])
            .await
            .map_err(|e| match e {
                Error::Io(io) => Error::inspection(&reference, io.to_string()),
                other => other,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::inspection(reference, stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        trace!("Manifest for {}: {}", image, stdout);
        Ok(stdout)
    }

    async fn pull(&self, image: &ImageReference) -> Result<()> {
        let reference = image.to_string();
        self.mutate(MutationOp::Pull, image, &["pull", &reference]).await
    }

    async fn tag(&self, source: &ImageReference, target: &ImageReference) -> Result<()> {
        let (src, dest) = (source.to_string(), target.to_string());
        self.mutate(MutationOp::Tag, target, &["tag", &src, &dest]).await
    }

    async fn push(&self, image: &ImageReference) -> Result<()> {
        let reference = image.to_string();
        self.mutate(MutationOp::Push, image, &["push", &reference]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let err =
            DockerCli::new("retag-no-such-docker-binary", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn test_describe_command() {
        assert_eq!(
            DockerCli::describe(&["manifest", "inspect", "temporalio/temporal:latest"]),
            "docker manifest inspect temporalio/temporal:latest"
        );
    }
}
