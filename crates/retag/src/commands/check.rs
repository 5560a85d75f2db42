//! Check command: is the release image already tagged latest?

use crate::cli::CheckArgs;
use crate::commands::resolve::{emit_release_outputs, resolve_release};
use crate::output;
use crate::pipeline::PipelineOutputs;
use anyhow::{Context, Result};
use retag_core::Settings;
use retag_image::{Comparison, DigestComparator, DigestComparison, DockerCli, ImageReference};
use tracing::{debug, warn};

/// Execute check command
///
/// Only input errors fail the command. A missing docker binary or a failed
/// inspection reports `already_latest=false`.
pub async fn run(args: CheckArgs, settings: &Settings) -> Result<()> {
    let resolved = resolve_release(&args.release, settings)?;
    let source = override_or(args.source_image.as_deref(), resolved.source.clone())
        .context("Invalid --source-image")?;
    let latest = override_or(args.latest_image.as_deref(), resolved.latest.clone())
        .context("Invalid --latest-image")?;

    let mut outputs = PipelineOutputs::new(args.output.output_file);
    emit_release_outputs(&mut outputs, &resolved)?;

    output::kv("Version", resolved.version.as_str());
    output::info("Checking if image is already tagged as latest...");

    let comparison = match DockerCli::from_settings(settings) {
        Ok(docker) => {
            DigestComparator::new(&docker)
                .compare(&source, &latest)
                .await
        }
        Err(e) => {
            warn!("Cannot inspect manifests: {}", e);
            DigestComparison::new(None, None)
        }
    };

    report(&comparison, resolved.version.as_str());
    emit_comparison_outputs(&mut outputs, &comparison)?;

    Ok(())
}

fn override_or(raw: Option<&str>, default: ImageReference) -> Result<ImageReference> {
    match raw {
        Some(raw) => {
            debug!("Using override image reference {}", raw);
            Ok(ImageReference::parse(raw)?)
        }
        None => Ok(default),
    }
}

fn report(comparison: &DigestComparison, version: &str) {
    match comparison.outcome {
        Comparison::Equal => {
            output::success(&format!("Image {} is already tagged as latest", version));
        }
        Comparison::NotEqual => {
            if let Some(digest) = &comparison.latest_digest {
                output::kv("Latest digest", digest.as_str());
            }
            if let Some(digest) = &comparison.source_digest {
                output::kv("Source digest", digest.as_str());
            }
            output::info("Digests do not match, will update latest tag");
        }
        Comparison::Indeterminate => {
            output::warning("Could not compare digests (image may not exist yet)");
        }
    }
}

/// Write `already_latest` plus whichever digests are known
fn emit_comparison_outputs(
    outputs: &mut PipelineOutputs,
    comparison: &DigestComparison,
) -> Result<()> {
    let already_latest = if comparison.already_latest() {
        "true"
    } else {
        "false"
    };
    outputs.set("already_latest", already_latest)?;

    if let Some(digest) = &comparison.latest_digest {
        outputs.set("latest_digest", digest.as_str())?;
    }
    if let Some(digest) = &comparison.source_digest {
        outputs.set("source_digest", digest.as_str())?;
    }
    Ok(())
}
