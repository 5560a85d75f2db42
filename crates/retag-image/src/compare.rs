//! Digest comparison between a release image and the latest tag

use crate::registry::RegistryTool;
use crate::types::{ImageManifest, ImageReference, ManifestDigest};
use retag_core::Result;
use tracing::{debug, warn};

/// Outcome of comparing two manifest digests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Both digests known and byte-equal
    Equal,
    /// Both digests known and different
    NotEqual,
    /// At least one image could not be inspected
    Indeterminate,
}

impl Comparison {
    /// Decide from whichever digests could be fetched
    pub fn from_digests(
        latest: Option<&ManifestDigest>,
        source: Option<&ManifestDigest>,
    ) -> Self {
        match (latest, source) {
            (Some(latest), Some(source)) if latest == source => Comparison::Equal,
            (Some(_), Some(_)) => Comparison::NotEqual,
            _ => Comparison::Indeterminate,
        }
    }
}

/// Comparison result together with the digests that were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestComparison {
    pub outcome: Comparison,
    pub latest_digest: Option<ManifestDigest>,
    pub source_digest: Option<ManifestDigest>,
}

impl DigestComparison {
    pub fn new(
        latest_digest: Option<ManifestDigest>,
        source_digest: Option<ManifestDigest>,
    ) -> Self {
        Self {
            outcome: Comparison::from_digests(latest_digest.as_ref(), source_digest.as_ref()),
            latest_digest,
            source_digest,
        }
    }

    /// Latest already points at the source image
    pub fn already_latest(&self) -> bool {
        self.outcome == Comparison::Equal
    }

    /// Anything short of a confirmed match means the tag must move
    pub fn should_retag(&self) -> bool {
        !self.already_latest()
    }
}

/// Fetches and compares manifest digests through a [`RegistryTool`]
pub struct DigestComparator<'a> {
    tool: &'a dyn RegistryTool,
}

impl<'a> DigestComparator<'a> {
    pub fn new(tool: &'a dyn RegistryTool) -> Self {
        Self { tool }
    }

    /// Compare the source image against the latest tag.
    ///
    /// Each image is inspected exactly once, latest first. Inspection
    /// failures are logged and produce [`Comparison::Indeterminate`]; they
    /// never fail the comparison.
    pub async fn compare(
        &self,
        source: &ImageReference,
        latest: &ImageReference,
    ) -> DigestComparison {
        debug!("Inspecting manifests with {}", self.tool.name());
        let latest_digest = self.digest_or_log(latest).await;
        let source_digest = self.digest_or_log(source).await;

        let comparison = DigestComparison::new(latest_digest, source_digest);
        debug!(
            "Compared {} against {}: {:?}",
            source, latest, comparison.outcome
        );
        comparison
    }

    /// Fetch the config digest of one image
    pub async fn fetch_digest(&self, image: &ImageReference) -> Result<ManifestDigest> {
        let raw = self.tool.inspect_manifest(image).await?;
        ImageManifest::config_digest(image, &raw)
    }

    async fn digest_or_log(&self, image: &ImageReference) -> Option<ManifestDigest> {
        match self.fetch_digest(image).await {
            Ok(digest) => Some(digest),
            Err(e) => {
                warn!("Could not inspect {} (image may not exist yet): {}", image, e);
                None
            }
        }
    }
}
