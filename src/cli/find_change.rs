//! Find-change command implementation

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::utils::commit_search;
use crate::config::load_config;
use crate::git::GitRepo;
use crate::matcher::Change;

#[derive(Args)]
pub struct FindChangeArgs {
    /// Patch containing the change
    #[arg(long, value_name = "FILE")]
    pub patch: Option<PathBuf>,

    /// Commit containing the change
    #[arg(long, value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Subject of the change
    #[arg(long, value_name = "SUBJECT")]
    pub subject: Option<String>,

    /// Author of the change ("Name <email>")
    #[arg(long, value_name = "AUTHOR")]
    pub author: Option<String>,

    /// Local repository to find the change in
    #[arg(long, value_name = "DIR", default_value = "./")]
    pub repo: PathBuf,

    /// Commit range (or ref) to find the change in
    #[arg(long, value_name = "RANGE")]
    pub commits: Option<String>,

    /// Patch files to find the change in
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub patches: Vec<PathBuf>,

    /// External commit search script (defaults to the built-in search)
    #[arg(long, value_name = "SCRIPT", env = "GIT_HELPERS_FIND_COMMIT")]
    pub search_script: Option<PathBuf>,

    /// Path to config file (git-helpers.toml or .git-helpers.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

enum ChangeSource<'a> {
    Patch(&'a Path),
    Commit(&'a str),
    Subject(&'a str),
}

pub fn run(args: FindChangeArgs) -> Result<ExitCode> {
    let source = match (&args.patch, &args.commit, &args.subject) {
        (Some(patch), _, _) => ChangeSource::Patch(patch),
        (None, Some(commit), _) => ChangeSource::Commit(commit),
        (None, None, Some(subject)) => ChangeSource::Subject(subject),
        (None, None, None) => anyhow::bail!("--patch, --commit, or --subject should be set"),
    };

    if args.commits.is_none() && args.patches.is_empty() {
        anyhow::bail!("--commits or --patches should be given");
    }

    let config = load_config(&args.repo, args.config.as_deref())?;

    let change = match source {
        ChangeSource::Patch(path) => Change::from_patch_file(path)?,
        ChangeSource::Commit(rev) => {
            let repo = GitRepo::discover(&args.repo)?;
            let id = repo.resolve_commit(rev)?;
            Change::from_commit(&repo, &id)?
        }
        ChangeSource::Subject(subject) => Change::from_fields(subject, args.author.clone()),
    };

    if let Some(range) = &args.commits {
        let search = commit_search(args.search_script.or(config.find_commit_script), &args.repo)?;
        return match change.find_matching_commit(search.as_ref(), range)? {
            Some(id) => {
                println!(
                    "{} (\"{}\")",
                    id.short(config.hash_length),
                    change.subject().unwrap_or_default()
                );
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        };
    }

    match change.find_matching_patch(&args.patches)? {
        Some(patch) => {
            let path = patch.path().map(Path::to_path_buf).unwrap_or_default();
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("no matching patch file found");
            Ok(ExitCode::FAILURE)
        }
    }
}
