//! Adapters for the version-control collaborators
//!
//! The matching and timeline logic only sees the two traits below; the
//! implementations either shell out to a `find_commit_in` style script or
//! query a local repository through libgit2.

use crate::domain::{CommitId, CommitMetadata};
use crate::error::Result;

pub mod repo;
pub mod search;

pub use repo::GitRepo;
pub use search::ScriptCommitSearch;

/// Locate a commit by author and title inside a tree (a ref or `a..b` range).
///
/// `Ok(None)` means "no such commit"; errors are reserved for searches that
/// could not be carried out at all.
pub trait CommitSearch {
    fn find_commit(&self, author: Option<&str>, title: &str, tree: &str)
        -> Result<Option<CommitId>>;
}

/// Read subject, people and dates of a commit.
pub trait CommitMetadataSource {
    fn commit_metadata(&self, id: &CommitId) -> Result<CommitMetadata>;
}
