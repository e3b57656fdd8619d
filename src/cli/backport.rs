//! Backport command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use super::utils::parse_styles;
use crate::config::load_config;
use crate::domain::CommitId;
use crate::git::repo::GlobalGitConfig;
use crate::git::GitRepo;
use crate::patch::{decorate_for_backport, IdentitySource, PatchDocument};

#[derive(Args)]
pub struct BackportArgs {
    /// Patch file to decorate
    #[arg(value_name = "PATCH")]
    pub patch: PathBuf,

    /// Upstream commit the patch was taken from
    #[arg(short, long, value_name = "COMMIT")]
    pub upstream: String,

    /// Provenance styles (comma-separated: stable, cherry-pick)
    #[arg(short, long, value_name = "STYLES")]
    pub style: Option<String>,

    /// Rewrite the patch file instead of printing the result
    #[arg(short, long)]
    pub in_place: bool,

    /// Repository whose git config supplies the sign-off identity
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Path to config file (git-helpers.toml or .git-helpers.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: BackportArgs) -> Result<ExitCode> {
    let config = load_config(&args.repo, args.config.as_deref())?;
    let styles = match parse_styles(&args.style)? {
        Some(styles) => styles,
        None => config.backport_styles.clone(),
    };

    let upstream = args.upstream.trim();
    if upstream.is_empty() {
        anyhow::bail!("--upstream must name a commit");
    }
    let upstream = CommitId::new(upstream);

    let mut patch = PatchDocument::from_file(&args.patch)?;

    let signer: Box<dyn IdentitySource> = match config.signoff_identity() {
        Some(identity) => Box::new(identity),
        None => match GitRepo::discover(&args.repo) {
            Ok(repo) => Box::new(repo),
            Err(e) => {
                tracing::debug!("no repository at {}: {}", args.repo.display(), e);
                Box::new(GlobalGitConfig)
            }
        },
    };
    decorate_for_backport(&mut patch, &upstream, &styles, signer.as_ref())?;

    if args.in_place {
        fs::write(&args.patch, patch.to_text())
            .with_context(|| format!("Failed writing patch {}", args.patch.display()))?;
    } else {
        print!("{patch}");
    }
    Ok(ExitCode::SUCCESS)
}
