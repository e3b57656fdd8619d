//! Finding the same change in another tree or patch queue
//!
//! A change is known only by its identity (author, subject, `Fixes:`
//! references). Commits are located through a [`CommitSearch`] backend,
//! patch files by parsing each candidate and comparing identities.

use crate::domain::{ChangeIdentity, CommitId};
use crate::git::{CommitMetadataSource, CommitSearch};
use crate::patch::PatchDocument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    identity: ChangeIdentity,
}

impl Change {
    pub fn from_patch(patch: &PatchDocument) -> Self {
        Self { identity: patch.identity() }
    }

    pub fn from_patch_file(path: &Path) -> Result<Self> {
        let patch = PatchDocument::from_file(path)
            .with_context(|| format!("Failed to load patch {}", path.display()))?;
        Ok(Self::from_patch(&patch))
    }

    /// Derive the change from a commit: its summary, its author as
    /// `name <email>`, and the `Fixes:` lines of its message.
    pub fn from_commit(source: &dyn CommitMetadataSource, id: &CommitId) -> Result<Self> {
        let meta = source
            .commit_metadata(id)
            .with_context(|| format!("Failed to read commit {id}"))?;
        let fixes = meta
            .message
            .lines()
            .filter_map(|line| line.strip_prefix("Fixes: "))
            .map(|fixes| fixes.trim().to_string())
            .collect();
        Ok(Self {
            identity: ChangeIdentity {
                author: Some(meta.author.who.to_string()),
                subject: Some(meta.subject),
                fixes,
            },
        })
    }

    pub fn from_fields(subject: impl Into<String>, author: Option<String>) -> Self {
        Self {
            identity: ChangeIdentity { author, subject: Some(subject.into()), fixes: Vec::new() },
        }
    }

    pub fn identity(&self) -> &ChangeIdentity {
        &self.identity
    }

    pub fn author(&self) -> Option<&str> {
        self.identity.author.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.identity.subject.as_deref()
    }

    /// Look the change up in `tree` (a ref or commit range).
    ///
    /// Returns `Ok(None)` when the search finds nothing, or when the change
    /// has no subject to search for.
    pub fn find_matching_commit(
        &self,
        search: &dyn CommitSearch,
        tree: &str,
    ) -> crate::error::Result<Option<CommitId>> {
        let Some(subject) = self.subject() else {
            tracing::debug!("change has no subject; nothing to search for");
            return Ok(None);
        };
        search.find_commit(self.author(), subject, tree)
    }

    /// First candidate patch, in the given order, with the same identity.
    pub fn find_matching_patch(&self, candidates: &[PathBuf]) -> Result<Option<PatchDocument>> {
        for path in candidates {
            let patch = PatchDocument::from_file(path)
                .with_context(|| format!("Failed to load candidate patch {}", path.display()))?;
            if patch.identity() == self.identity {
                tracing::debug!(path = %path.display(), "found matching patch");
                return Ok(Some(patch));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommitMetadata, Identity, PersonStamp};
    use crate::error::GitHelperError;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Answers from a fixed table and records every query.
    #[derive(Default)]
    struct FakeSearch {
        hits: Vec<(String, String, String)>,
        queries: RefCell<Vec<(Option<String>, String, String)>>,
    }

    impl CommitSearch for FakeSearch {
        fn find_commit(
            &self,
            author: Option<&str>,
            title: &str,
            tree: &str,
        ) -> crate::error::Result<Option<CommitId>> {
            self.queries.borrow_mut().push((
                author.map(str::to_string),
                title.to_string(),
                tree.to_string(),
            ));
            if tree == "broken" {
                return Err(GitHelperError::MissingIdentity("user.name"));
            }
            Ok(self
                .hits
                .iter()
                .find(|(t, s, _)| t == tree && s == title)
                .map(|(_, _, id)| CommitId::new(id.clone())))
        }
    }

    struct OneCommit(CommitMetadata);

    impl CommitMetadataSource for OneCommit {
        fn commit_metadata(&self, _id: &CommitId) -> crate::error::Result<CommitMetadata> {
            Ok(self.0.clone())
        }
    }

    fn write_patch(dir: &Path, name: &str, author: &str, subject: &str, fixes: &[&str]) -> PathBuf {
        let fixes: String = fixes.iter().map(|f| format!("Fixes: {f}\n")).collect();
        let path = dir.join(name);
        fs::write(
            &path,
            format!("From: {author}\nSubject: [PATCH] {subject}\n\nBody.\n\n{fixes}---\n{name}\n"),
        )
        .expect("write patch");
        path
    }

    #[test]
    fn test_matching_commit_uses_author_and_subject() {
        let search = FakeSearch {
            hits: vec![("v6.1..stable".into(), "mm: fix leak".into(), "abcdef012345".into())],
            ..Default::default()
        };
        let change = Change::from_fields("mm: fix leak", Some("A <a@x>".into()));

        let found = change.find_matching_commit(&search, "v6.1..stable").expect("search");
        assert_eq!(found, Some(CommitId::new("abcdef012345")));
        assert_eq!(
            search.queries.borrow()[0],
            (Some("A <a@x>".into()), "mm: fix leak".into(), "v6.1..stable".into())
        );
    }

    #[test]
    fn test_no_matching_commit_is_none() {
        let search = FakeSearch::default();
        let change = Change::from_fields("mm: fix leak", None);
        assert_eq!(change.find_matching_commit(&search, "HEAD").expect("search"), None);
    }

    #[test]
    fn test_search_errors_are_distinct_from_not_found() {
        let search = FakeSearch::default();
        let change = Change::from_fields("mm: fix leak", None);
        assert!(change.find_matching_commit(&search, "broken").is_err());
    }

    #[test]
    fn test_change_without_subject_skips_search() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nosubject.patch");
        fs::write(&path, "From: A <a@x>\n\nbody\n---\nd\n").expect("write");

        let search = FakeSearch::default();
        let change = Change::from_patch_file(&path).expect("change");
        assert_eq!(change.find_matching_commit(&search, "HEAD").expect("search"), None);
        assert!(search.queries.borrow().is_empty());
    }

    #[test]
    fn test_matching_patch_first_in_candidate_order() {
        let tmp = TempDir::new().expect("tmp");
        let dir = tmp.path();
        let other = write_patch(dir, "0001-other.patch", "A <a@x>", "other", &[]);
        let second = write_patch(dir, "0002-fix.patch", "A <a@x>", "mm: fix leak", &["123"]);
        let third = write_patch(dir, "0003-fix-again.patch", "A <a@x>", "mm: fix leak", &["123"]);
        let source = write_patch(dir, "source.patch", "A <a@x>", "mm: fix leak", &["123"]);

        let change = Change::from_patch_file(&source).expect("change");
        let found = change
            .find_matching_patch(&[other.clone(), third.clone(), second.clone()])
            .expect("match")
            .expect("some patch");
        assert_eq!(found.path(), Some(third.as_path()));

        let found = change.find_matching_patch(&[other, second.clone()]).expect("match");
        assert_eq!(found.and_then(|p| p.path().map(Path::to_path_buf)), Some(second));
    }

    #[test]
    fn test_fixes_participate_in_patch_identity() {
        let tmp = TempDir::new().expect("tmp");
        let dir = tmp.path();
        let candidate = write_patch(dir, "c.patch", "A <a@x>", "mm: fix leak", &["111"]);
        let source = write_patch(dir, "s.patch", "A <a@x>", "mm: fix leak", &["222"]);

        let change = Change::from_patch_file(&source).expect("change");
        assert!(change.find_matching_patch(&[candidate]).expect("match").is_none());
    }

    #[test]
    fn test_fields_change_matches_patch_without_fixes() {
        let tmp = TempDir::new().expect("tmp");
        let candidate = write_patch(tmp.path(), "c.patch", "A <a@x>", "mm: fix leak", &[]);

        let change = Change::from_fields("mm: fix leak", Some("A <a@x>".into()));
        assert!(change.find_matching_patch(&[candidate]).expect("match").is_some());
    }

    #[test]
    fn test_unreadable_candidate_is_error() {
        let tmp = TempDir::new().expect("tmp");
        let change = Change::from_fields("x", None);
        assert!(change.find_matching_patch(&[tmp.path().join("missing.patch")]).is_err());
    }

    #[test]
    fn test_change_from_commit() {
        let stamp = |name: &str, email: &str| PersonStamp {
            who: Identity::new(name, email),
            date: "2024-01-01T00:00:00+00:00".into(),
        };
        let source = OneCommit(CommitMetadata {
            id: CommitId::new("abc"),
            subject: "mm: fix leak".into(),
            message: "mm: fix leak\n\nFixes: 111 (\"x\")\nFixes: 222\n".into(),
            author: stamp("A", "a@x"),
            committer: stamp("C", "c@x"),
        });

        let change = Change::from_commit(&source, &CommitId::new("abc")).expect("change");
        assert_eq!(change.author(), Some("A <a@x>"));
        assert_eq!(change.subject(), Some("mm: fix leak"));
        assert_eq!(change.identity().fixes, ["111 (\"x\")", "222"]);
    }
}
