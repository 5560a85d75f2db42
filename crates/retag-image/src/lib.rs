//! Container image handling for the retag CLI
//!
//! This crate provides functionality for:
//! - Normalizing release tags and building repository image references
//! - Inspecting manifests and comparing config digests through a registry tool
//! - Promoting a release to the latest tag (pull, tag, push) when needed
//!
//! # Example
//!
//! ```no_run
//! use retag_core::{ReleaseInputs, Settings};
//! use retag_image::{DockerCli, LatestTagUpdater, ReferenceBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let docker = DockerCli::from_settings(&settings)?;
//!
//!     let mut updater = LatestTagUpdater::new(&docker, ReferenceBuilder::from_settings(&settings));
//!     let inputs = ReleaseInputs::new(None, Some("v1.22.0".into()), None);
//!     let report = updater.run(&inputs).await?;
//!
//!     println!("{:?}: {}", report.outcome, report.source);
//!
//!     Ok(())
//! }
//! ```

pub mod compare;
pub mod reference;
pub mod registry;
pub mod types;
pub mod updater;

// Re-export main types for convenience
pub use compare::{Comparison, DigestComparator, DigestComparison};
pub use reference::{
    normalize_version, validate_digest, ReferenceBuilder, ReleaseReference, ResolvedRelease,
    Version,
};
pub use registry::{DockerCli, RegistryTool};
pub use types::{ImageManifest, ImageReference, ManifestConfig, ManifestDigest};
pub use updater::{LatestTagUpdater, UpdateOutcome, UpdateReport, UpdateState};
