//! Command-line interface for git-helpers
//!
//! Provides `find-change`, `timeline`, `backport` and `info` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backport;
mod find_change;
mod info;
mod timeline;
mod utils;

/// Recognize the same change across trees and patch queues, and prepare backports
#[derive(Parser)]
#[command(name = "git-helpers")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a change from a patch or commit and find the matching change in
    /// a commit range or a patch queue
    FindChange(find_change::FindChangeArgs),

    /// Show when a change was authored and when it landed in each tree
    Timeline(timeline::TimelineArgs),

    /// Add upstream provenance and a sign-off to a patch description
    Backport(backport::BackportArgs),

    /// Display the parsed fields of a patch file
    Info(info::InfoArgs),
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::FindChange(args) => find_change::run(args),
        Commands::Timeline(args) => timeline::run(args),
        Commands::Backport(args) => backport::run(args),
        Commands::Info(args) => info::run(args),
    }
}
