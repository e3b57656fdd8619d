//! git-helpers command-line entry point

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    git_helpers::cli::run()
}
