//! Local repository access through libgit2

use super::CommitMetadataSource;
use crate::domain::{CommitId, CommitMetadata, Identity, PersonStamp};
use crate::error::{GitHelperError, Result};
use crate::patch::IdentitySource;
use crate::utils::decode_lossy;
use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use git2::{Repository, Signature};
use std::path::Path;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`, walking up like `git` does.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        tracing::debug!(path = %repo.path().display(), "opened repository");
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Resolve any revision expression to the commit it names.
    pub fn resolve_commit(&self, rev: &str) -> Result<CommitId> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(CommitId::new(commit.id().to_string()))
    }
}

impl IdentitySource for GitRepo {
    fn signer_identity(&self) -> Result<Identity> {
        identity_from_config(&self.repo.config()?)
    }
}

/// The user's global git configuration, for use outside any repository.
pub struct GlobalGitConfig;

impl IdentitySource for GlobalGitConfig {
    fn signer_identity(&self) -> Result<Identity> {
        identity_from_config(&git2::Config::open_default()?)
    }
}

fn identity_from_config(config: &git2::Config) -> Result<Identity> {
    let name =
        config.get_string("user.name").map_err(|_| GitHelperError::MissingIdentity("user.name"))?;
    let email =
        config.get_string("user.email").map_err(|_| GitHelperError::MissingIdentity("user.email"))?;
    Ok(Identity::new(name, email))
}

impl CommitMetadataSource for GitRepo {
    fn commit_metadata(&self, id: &CommitId) -> Result<CommitMetadata> {
        let commit = self.repo.revparse_single(id.as_str())?.peel_to_commit()?;
        let meta = CommitMetadata {
            id: CommitId::new(commit.id().to_string()),
            subject: commit.summary_bytes().map(decode_lossy).unwrap_or_default(),
            message: decode_lossy(commit.message_bytes()),
            author: stamp(&commit.author()),
            committer: stamp(&commit.committer()),
        };
        Ok(meta)
    }
}

fn stamp(signature: &Signature<'_>) -> PersonStamp {
    PersonStamp {
        who: Identity::new(decode_lossy(signature.name_bytes()), decode_lossy(signature.email_bytes())),
        date: iso_strict(signature.when()),
    }
}

/// Format like `git log --date=iso-strict`, in the signature's own offset.
fn iso_strict(time: git2::Time) -> String {
    let offset =
        FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    match DateTime::from_timestamp(time.seconds(), 0) {
        Some(utc) => utc.with_timezone(&offset).to_rfc3339_opts(SecondsFormat::Secs, false),
        None => time.seconds().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use git2::Time;

    pub(crate) fn init_repo(path: &Path) -> GitRepo {
        let repo = Repository::init(path).expect("init repo");
        GitRepo::from_repository(repo)
    }

    /// Commit an empty tree on top of HEAD, authored and committed by the same person.
    pub(crate) fn commit_as(
        repo: &GitRepo,
        message: &str,
        name: &str,
        email: &str,
        seconds: i64,
    ) -> CommitId {
        let sig = Signature::new(name, email, &Time::new(seconds, 0)).expect("signature");
        commit_with(repo, message, &sig, &sig)
    }

    pub(crate) fn commit_with(
        repo: &GitRepo,
        message: &str,
        author: &Signature<'_>,
        committer: &Signature<'_>,
    ) -> CommitId {
        let repo = repo.repository();
        let tree_id = repo.treebuilder(None).expect("treebuilder").write().expect("tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = repo
            .commit(Some("HEAD"), author, committer, message, &tree, &parents)
            .expect("commit");
        CommitId::new(oid.to_string())
    }

    #[test]
    fn test_commit_metadata() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let repo = init_repo(tmp.path());
        let author =
            Signature::new("A U Thor", "a@example.com", &Time::new(1_704_067_200, 0)).unwrap();
        let committer =
            Signature::new("C O Mitter", "c@example.com", &Time::new(1_704_160_800, 120)).unwrap();
        let id = commit_with(&repo, "mm: fix leak\n\nFixes: abc123\n", &author, &committer);

        let meta = repo.commit_metadata(&id).expect("metadata");
        assert_eq!(meta.id, id);
        assert_eq!(meta.subject, "mm: fix leak");
        assert_eq!(meta.message, "mm: fix leak\n\nFixes: abc123\n");
        assert_eq!(meta.author.who, Identity::new("A U Thor", "a@example.com"));
        assert_eq!(meta.author.date, "2024-01-01T00:00:00+00:00");
        assert_eq!(meta.committer.who.to_string(), "C O Mitter <c@example.com>");
        assert_eq!(meta.committer.date, "2024-01-02T04:00:00+02:00");
    }

    #[test]
    fn test_resolve_commit_accepts_revisions() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let repo = init_repo(tmp.path());
        let first = commit_as(&repo, "first", "A", "a@example.com", 1_700_000_000);
        commit_as(&repo, "second", "A", "a@example.com", 1_700_000_100);

        assert_eq!(repo.resolve_commit("HEAD~1").expect("resolve"), first);
        assert!(repo.resolve_commit("does-not-exist").is_err());
    }

    #[test]
    fn test_signer_identity_from_config() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let repo = init_repo(tmp.path());
        let mut config = repo.repository().config().expect("config");
        config.set_str("user.name", "Stable Maint").expect("set name");
        config.set_str("user.email", "stable@example.com").expect("set email");

        let who = repo.signer_identity().expect("identity");
        assert_eq!(who, Identity::new("Stable Maint", "stable@example.com"));
    }
}
