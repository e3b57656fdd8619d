//! Shared CLI utilities.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::BackportStyle;
use crate::git::{CommitSearch, GitRepo, ScriptCommitSearch};
use crate::utils::split_csv;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_deref().map(split_csv)
}

/// Parse `--style stable,cherry-pick`.
pub fn parse_styles(value: &Option<String>) -> Result<Option<Vec<BackportStyle>>> {
    let Some(parts) = parse_csv(value) else {
        return Ok(None);
    };
    let styles = parts
        .iter()
        .map(|part| part.parse::<BackportStyle>().map_err(anyhow::Error::msg))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(styles))
}

/// The external script when one is configured, otherwise the built-in
/// search over `repo`.
pub fn commit_search(script: Option<PathBuf>, repo: &Path) -> Result<Box<dyn CommitSearch>> {
    match script {
        Some(script) => {
            tracing::debug!(script = %script.display(), "using external commit search");
            Ok(Box::new(ScriptCommitSearch::new(script, Some(repo.to_path_buf()))))
        }
        None => Ok(Box::new(GitRepo::discover(repo)?)),
    }
}
