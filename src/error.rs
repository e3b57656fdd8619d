//! Errors surfaced by the git adapters

use std::path::PathBuf;
use thiserror::Error;

/// Failures a caller may need to tell apart from "not found".
///
/// A search that simply finds nothing is `Ok(None)`, never one of these.
#[derive(Debug, Error)]
pub enum GitHelperError {
    #[error("failed to run commit search script {script}: {source}")]
    SearchSpawn {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve tree reference '{tree}': {source}")]
    InvalidTree {
        tree: String,
        #[source]
        source: git2::Error,
    },

    #[error("no {0} configured for sign-off (set it with `git config {0}`)")]
    MissingIdentity(&'static str),

    #[error(transparent)]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, GitHelperError>;
