//! Resolve command: release tag to version and image references

use crate::cli::{ReleaseArgs, ResolveArgs};
use crate::output;
use crate::pipeline::PipelineOutputs;
use anyhow::Result;
use retag_core::{config::ENV_RELEASE_TAG, Error, ReleaseInputs, Settings};
use retag_image::{ReferenceBuilder, ResolvedRelease};

/// Execute resolve command
pub fn run(args: ResolveArgs, settings: &Settings) -> Result<()> {
    let resolved = resolve_release(&args.release, settings)?;

    let mut outputs = PipelineOutputs::new(args.output.output_file);
    emit_release_outputs(&mut outputs, &resolved)?;

    output::kv("Version", resolved.version.as_str());
    output::kv("Source image", &resolved.source.to_string());
    output::kv("Latest image", &resolved.latest.to_string());

    Ok(())
}

/// Normalize the release tag and build its image references
pub fn resolve_release(args: &ReleaseArgs, settings: &Settings) -> Result<ResolvedRelease> {
    let inputs = ReleaseInputs::new(args.release_tag.clone(), None, None);
    let release_tag = inputs.release_tag.ok_or_else(|| {
        Error::validation(format!(
            "{} (or --release-tag) must be provided",
            ENV_RELEASE_TAG
        ))
    })?;

    let resolved = ReferenceBuilder::from_settings(settings).resolve(&release_tag)?;
    Ok(resolved)
}

/// Write `version`, `source_image` and `latest_image`
pub fn emit_release_outputs(
    outputs: &mut PipelineOutputs,
    resolved: &ResolvedRelease,
) -> Result<()> {
    outputs.set("version", resolved.version.as_str())?;
    outputs.set("source_image", &resolved.source.to_string())?;
    outputs.set("latest_image", &resolved.latest.to_string())?;
    Ok(())
}
