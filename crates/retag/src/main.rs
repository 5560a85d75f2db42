//! retag CLI - release image resolution and latest-tag promotion
//!
//! This is the main entry point for the retag command-line interface.

mod cli;
mod commands;
mod output;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use retag_core::SettingsLoader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    let settings = SettingsLoader::new()?
        .load(cli.config.as_deref())
        .context("Failed to load retag settings")?;

    // Run command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &settings),
        Commands::Check(args) => commands::check::run(args, &settings).await,
        Commands::Update(args) => commands::update::run(args, &settings).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr; stdout carries step outputs
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
