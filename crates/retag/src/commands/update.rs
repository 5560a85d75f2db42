//! Update command: promote a release to the latest tag

use crate::cli::UpdateArgs;
use crate::output;
use anyhow::Result;
use retag_core::{ReleaseInputs, Settings};
use retag_image::{
    DockerCli, LatestTagUpdater, ReferenceBuilder, ReleaseReference, UpdateOutcome,
};

/// Execute update command
pub async fn run(args: UpdateArgs, settings: &Settings) -> Result<()> {
    let inputs = ReleaseInputs::new(None, args.tag, args.sha);
    let builder = ReferenceBuilder::from_settings(settings);

    // Input errors are reported even when docker is missing. The updater
    // validates again as part of its own run.
    ReleaseReference::from_inputs(inputs.tag_input.as_deref(), inputs.sha_input.as_deref())?;

    let docker = DockerCli::from_settings(settings)?;
    let mut updater = LatestTagUpdater::new(&docker, builder);
    let report = updater.run(&inputs).await?;

    match report.outcome {
        UpdateOutcome::AlreadyLatest => output::info(&format!(
            "Image {} is already tagged as latest. No action needed.",
            report.release.label()
        )),
        UpdateOutcome::Retagged => output::success(&format!(
            "Successfully updated latest tag to point to {}",
            report.release.label()
        )),
    }

    Ok(())
}
