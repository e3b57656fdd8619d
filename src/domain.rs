//! Core value types shared by patches, matchers and the git adapters

use std::fmt;
use std::str::FromStr;

/// A commit identifier as reported by git or the search primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviate to at most `len` characters.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The tuple used to recognize "the same change" across contexts.
///
/// Diff content and dates never participate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeIdentity {
    pub author: Option<String>,
    pub subject: Option<String>,
    pub fixes: Vec<String>,
}

/// A display name and email address pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }

    pub fn signed_off_by(&self) -> String {
        format!("Signed-off-by: {self}")
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Who did something to a commit, and when (ISO-8601 strict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonStamp {
    pub who: Identity,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMetadata {
    pub id: CommitId,
    pub subject: String,
    pub message: String,
    pub author: PersonStamp,
    pub committer: PersonStamp,
}

/// Provenance annotations a backport can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackportStyle {
    /// Leading `commit <id> upstream.` line, as used by stable trees.
    Stable,
    /// Trailing `(cherry picked from commit <id>)` line.
    CherryPick,
}

impl FromStr for BackportStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "cherry-pick" | "cherry_pick" | "cherrypick" => Ok(Self::CherryPick),
            other => Err(format!(
                "Invalid backport style '{other}' (expected 'stable' or 'cherry-pick')"
            )),
        }
    }
}

impl fmt::Display for BackportStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::CherryPick => f.write_str("cherry-pick"),
        }
    }
}
