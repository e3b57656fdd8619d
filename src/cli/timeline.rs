//! Timeline command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

use super::utils::commit_search;
use crate::config::load_config;
use crate::git::{CommitMetadataSource, GitRepo};
use crate::matcher::Change;
use crate::timeline::build_timeline;

#[derive(Args)]
pub struct TimelineArgs {
    /// Subject of the patch
    #[arg(long, value_name = "SUBJECT")]
    pub subject: Option<String>,

    /// Author of the patch
    #[arg(long, value_name = "AUTHOR")]
    pub author: Option<String>,

    /// Commit id of the patch (supplies the subject, and the author unless --author is given)
    #[arg(long, value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Local repository holding the trees
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// External commit search script (defaults to the built-in search)
    #[arg(long, value_name = "SCRIPT", env = "GIT_HELPERS_FIND_COMMIT")]
    pub search_script: Option<PathBuf>,

    /// Path to config file (git-helpers.toml or .git-helpers.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Trees to check for the patch
    #[arg(value_name = "TREE", required = true, num_args = 1..)]
    pub trees: Vec<String>,
}

enum ChangeSource {
    Fields(String, Option<String>),
    /// Subject from the commit; author given on the command line or taken
    /// from the commit.
    Commit(String, Option<String>),
}

pub fn run(args: TimelineArgs) -> Result<ExitCode> {
    let source = match (args.subject, args.author, args.commit) {
        (Some(subject), author, _) => ChangeSource::Fields(subject, author),
        (None, author, Some(commit)) => ChangeSource::Commit(commit, author),
        (None, _, None) => anyhow::bail!("subject and author, or commit are necessary"),
    };

    let config = load_config(&args.repo, args.config.as_deref())?;
    let repo = GitRepo::discover(&args.repo)?;

    let change = match source {
        ChangeSource::Fields(subject, author) => Change::from_fields(subject, author),
        ChangeSource::Commit(commit, author) => {
            let meta = repo.commit_metadata(&repo.resolve_commit(&commit)?)?;
            Change::from_fields(meta.subject, Some(author.unwrap_or(meta.author.who.name)))
        }
    };

    let search = commit_search(args.search_script.or(config.find_commit_script), &args.repo)?;
    let timeline = build_timeline(&change, &args.trees, search.as_ref(), &repo)?;
    print!("{}", timeline.render());
    Ok(ExitCode::SUCCESS)
}
