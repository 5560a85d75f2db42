//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use retag_core::config::{ENV_INPUT_SHA, ENV_INPUT_TAG, ENV_RELEASE_TAG};

/// retag - keep a repository's latest image tag on the newest release
#[derive(Parser, Debug)]
#[command(name = "retag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to retag.yaml settings file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a release tag into version and image references
    Resolve(ResolveArgs),

    /// Check whether the release image is already tagged latest
    Check(CheckArgs),

    /// Move the latest tag to a release (by tag or by digest)
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Release identifier, e.g. v1.22.0
    #[arg(long, env = ENV_RELEASE_TAG)]
    pub release_tag: Option<String>,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// File receiving key=value step outputs (falls back to ::set-output)
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Compare this image instead of the resolved release image
    #[arg(long)]
    pub source_image: Option<String>,

    /// Compare against this image instead of the repository's latest tag
    #[arg(long)]
    pub latest_image: Option<String>,
}

// Tag and sha conflicts are reported by the updater, not by clap, so the
// error and exit code match every other validation failure.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Release tag to promote, e.g. v1.22.0
    #[arg(long, env = ENV_INPUT_TAG)]
    pub tag: Option<String>,

    /// Image digest to promote, e.g. sha256:abc123...
    #[arg(long, env = ENV_INPUT_SHA)]
    pub sha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["retag", "resolve", "--release-tag", "v1.22.0"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.release.release_tag.as_deref(), Some("v1.22.0"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_overrides() {
        let cli = Cli::try_parse_from([
            "retag",
            "-vv",
            "check",
            "--release-tag",
            "v1.22.0",
            "--latest-image",
            "temporalio/temporal:stable",
            "--output-file",
            "/tmp/out",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(
                    args.latest_image.as_deref(),
                    Some("temporalio/temporal:stable")
                );
                assert_eq!(
                    args.output.output_file.as_deref(),
                    Some(camino::Utf8Path::new("/tmp/out"))
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_accepts_both_inputs() {
        let cli =
            Cli::try_parse_from(["retag", "update", "--tag", "v1.22.0", "--sha", "sha256:abc"])
                .unwrap();
        match cli.command {
            Commands::Update(args) => {
                assert!(args.tag.is_some());
                assert!(args.sha.is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
