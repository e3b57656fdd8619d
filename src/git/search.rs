//! Commit search backends

use super::{CommitSearch, GitRepo};
use crate::domain::CommitId;
use crate::error::{GitHelperError, Result};
use crate::utils::decode_lossy;
use git2::Signature;
use std::path::PathBuf;
use std::process::Command;

/// Runs an external search script:
/// `<script> --hash_only [--author <a>] --title <t> <tree> [--repo <dir>]`.
///
/// The script prints a commit id on success. Any non-zero exit reads as
/// "not found": the script does not distinguish a missing commit from, say,
/// a bad tree reference, so neither can we. Its stderr is logged at debug.
#[derive(Debug, Clone)]
pub struct ScriptCommitSearch {
    script: PathBuf,
    repo: Option<PathBuf>,
}

impl ScriptCommitSearch {
    pub fn new(script: PathBuf, repo: Option<PathBuf>) -> Self {
        Self { script, repo }
    }

    fn command(&self, author: Option<&str>, title: &str, tree: &str) -> Command {
        let mut cmd = Command::new(&self.script);
        cmd.arg("--hash_only");
        if let Some(author) = author {
            cmd.args(["--author", author]);
        }
        cmd.args(["--title", title]).arg(tree);
        if let Some(repo) = &self.repo {
            cmd.arg("--repo").arg(repo);
        }
        cmd
    }
}

impl CommitSearch for ScriptCommitSearch {
    fn find_commit(
        &self,
        author: Option<&str>,
        title: &str,
        tree: &str,
    ) -> Result<Option<CommitId>> {
        tracing::debug!(script = %self.script.display(), ?author, title, tree, "searching commit");
        let output = self
            .command(author, title, tree)
            .output()
            .map_err(|source| GitHelperError::SearchSpawn { script: self.script.clone(), source })?;

        if !output.status.success() {
            let stderr = decode_lossy(&output.stderr);
            tracing::debug!(
                status = %output.status,
                stderr = %stderr.trim(),
                "commit search reported no match"
            );
            return Ok(None);
        }

        let stdout = decode_lossy(&output.stdout);
        Ok(stdout.trim().lines().next().map(str::trim).filter(|id| !id.is_empty()).map(CommitId::new))
    }
}

/// Native search: walk the tree's history and return the newest commit whose
/// summary equals `title` and whose author matches.
///
/// An author matches when it equals the signature's `name <email>`, its name,
/// or its email.
impl CommitSearch for GitRepo {
    fn find_commit(
        &self,
        author: Option<&str>,
        title: &str,
        tree: &str,
    ) -> Result<Option<CommitId>> {
        let repo = self.repository();
        let mut walk = repo.revwalk()?;
        let pushed = if tree.contains("..") {
            walk.push_range(tree)
        } else {
            repo.revparse_single(tree).and_then(|obj| obj.peel_to_commit()).and_then(|c| walk.push(c.id()))
        };
        pushed.map_err(|source| GitHelperError::InvalidTree { tree: tree.to_string(), source })?;

        for oid in walk {
            let commit = repo.find_commit(oid?)?;
            if commit.summary_bytes().map(decode_lossy).as_deref() != Some(title) {
                continue;
            }
            if let Some(author) = author {
                if !author_matches(&commit.author(), author) {
                    continue;
                }
            }
            tracing::debug!(commit = %commit.id(), tree, "found matching commit");
            return Ok(Some(CommitId::new(commit.id().to_string())));
        }
        Ok(None)
    }
}

fn author_matches(signature: &Signature<'_>, author: &str) -> bool {
    let name = decode_lossy(signature.name_bytes());
    let email = decode_lossy(signature.email_bytes());
    author == format!("{name} <{email}>") || author == name || author == email
}
