//! Latest-tag promotion
//!
//! Moves the latest tag to a release image unless it already points there.
//! The run is a small state machine:
//!
//! ```text
//! Start -> Validating -> Comparing -> AlreadyLatest
//!              |             |
//!              v             v
//!            Failed <- Retagging -> Done
//! ```
//!
//! Pull, tag and push are not transactional. A failure after a successful
//! pull leaves the pulled image in the local store, which a retry reuses.

use crate::compare::{Comparison, DigestComparator, DigestComparison};
use crate::reference::{ReferenceBuilder, ReleaseReference};
use crate::registry::RegistryTool;
use crate::types::ImageReference;
use retag_core::{ReleaseInputs, Result};
use std::fmt;
use tracing::{debug, info};

/// States of a promotion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Start,
    Validating,
    Comparing,
    AlreadyLatest,
    Retagging,
    Done,
    Failed,
}

impl UpdateState {
    /// Whether the run has finished in this state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            UpdateState::AlreadyLatest | UpdateState::Done | UpdateState::Failed
        )
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateState::Start => "start",
            UpdateState::Validating => "validating",
            UpdateState::Comparing => "comparing",
            UpdateState::AlreadyLatest => "already-latest",
            UpdateState::Retagging => "retagging",
            UpdateState::Done => "done",
            UpdateState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Latest already pointed at the release; nothing was changed
    AlreadyLatest,
    /// Latest was pulled, retagged and pushed
    Retagged,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub outcome: UpdateOutcome,
    pub release: ReleaseReference,
    pub source: ImageReference,
    pub latest: ImageReference,
    pub comparison: DigestComparison,
}

/// Drives one promotion of the latest tag
pub struct LatestTagUpdater<'a> {
    tool: &'a dyn RegistryTool,
    builder: ReferenceBuilder,
    history: Vec<UpdateState>,
}

impl<'a> LatestTagUpdater<'a> {
    pub fn new(tool: &'a dyn RegistryTool, builder: ReferenceBuilder) -> Self {
        Self {
            tool,
            builder,
            history: vec![UpdateState::Start],
        }
    }

    /// Current state
    pub fn state(&self) -> UpdateState {
        self.history
            .last()
            .copied()
            .unwrap_or(UpdateState::Start)
    }

    /// Every state visited by the last run, in order
    pub fn history(&self) -> &[UpdateState] {
        &self.history
    }

    fn transition(&mut self, next: UpdateState) {
        debug!("Updater: {} -> {}", self.state(), next);
        self.history.push(next);
    }

    /// Run the promotion for the `tag` / `sha` inputs.
    ///
    /// # Errors
    /// Validation errors (before any registry call) and pull/tag/push
    /// failures. Inspection failures are not errors; they lead to a retag.
    pub async fn run(&mut self, inputs: &ReleaseInputs) -> Result<UpdateReport> {
        self.history.truncate(1);

        self.transition(UpdateState::Validating);
        let release = match ReleaseReference::from_inputs(
            inputs.tag_input.as_deref(),
            inputs.sha_input.as_deref(),
        ) {
            Ok(release) => release,
            Err(e) => {
                self.transition(UpdateState::Failed);
                return Err(e);
            }
        };

        let source = self.builder.source_for(&release);
        let latest = self.builder.latest();
        info!("Using {}", release);

        self.transition(UpdateState::Comparing);
        info!("Checking if image is already tagged as latest...");
        let comparison = DigestComparator::new(self.tool)
            .compare(&source, &latest)
            .await;

        if comparison.already_latest() {
            self.transition(UpdateState::AlreadyLatest);
            debug!("Latest already points at {}", release.label());
            return Ok(UpdateReport {
                outcome: UpdateOutcome::AlreadyLatest,
                release,
                source,
                latest,
                comparison,
            });
        }

        match (&comparison.latest_digest, &comparison.source_digest) {
            (Some(latest_digest), Some(source_digest))
                if comparison.outcome == Comparison::NotEqual =>
            {
                info!("Latest digest: {}", latest_digest);
                info!("Source digest: {}", source_digest);
            }
            _ => info!("Could not compare digests, will proceed with tagging"),
        }

        self.transition(UpdateState::Retagging);
        if let Err(e) = self.retag(&source, &latest).await {
            self.transition(UpdateState::Failed);
            return Err(e);
        }

        self.transition(UpdateState::Done);
        debug!("Latest now points at {}", release.label());

        Ok(UpdateReport {
            outcome: UpdateOutcome::Retagged,
            release,
            source,
            latest,
            comparison,
        })
    }

    /// Pull, tag and push, stopping at the first failure
    async fn retag(&self, source: &ImageReference, latest: &ImageReference) -> Result<()> {
        info!("Pulling {}...", source);
        self.tool.pull(source).await?;

        info!("Tagging as {}...", latest);
        self.tool.tag(source, latest).await?;

        info!("Pushing {}...", latest);
        self.tool.push(latest).await?;

        Ok(())
    }
}
