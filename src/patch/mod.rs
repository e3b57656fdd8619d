//! Email-formatted patch documents
//!
//! A patch produced by `git format-patch` (or pulled out of a mail archive) is
//! split into three parts: the mail header block, the free-form description
//! body, and the diff. Only a handful of header and body lines are
//! interpreted; everything else is carried through verbatim so the document
//! can be written back out.

use crate::domain::ChangeIdentity;
use crate::utils::read_file_lossy;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod backport;

pub use backport::{decorate_for_backport, IdentitySource};

const THREE_DASH: &str = "\n---\n";
const DIFF_GIT: &str = "\ndiff --git";

/// `Subject: [PATCH v2 3/5] rest` keeps only `rest`.
static BRACKETED_SUBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Subject: \[[^\]]*\](.*)$").unwrap());

/// One parsed patch file.
///
/// Equality is change identity: author, subject and `Fixes:` references.
#[derive(Debug, Clone)]
pub struct PatchDocument {
    path: Option<PathBuf>,
    raw_header: String,
    description_body: String,
    diff: String,
    has_three_dash: bool,
    author: Option<String>,
    date: Option<String>,
    subject: Option<String>,
    fixes: Vec<String>,
}

impl PatchDocument {
    /// Read and parse a patch file. Undecodable bytes are replaced, never fatal.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_file_lossy(path)?;
        let mut doc = Self::parse_str(&content);
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    pub fn parse_str(content: &str) -> Self {
        let (description, diff, has_three_dash) =
            if let Some((description, diff)) = content.split_once(THREE_DASH) {
                (description, diff, true)
            } else if let Some((description, diff)) = content.split_once(DIFF_GIT) {
                (description, diff, false)
            } else {
                tracing::debug!("patch has neither a '---' line nor a 'diff --git' token");
                (content, "", false)
            };

        // Paragraph 0 is the mail header, the rest is the description body.
        let (raw_header, body) = description.split_once("\n\n").unwrap_or((description, ""));

        let mut doc = Self {
            path: None,
            raw_header: raw_header.to_string(),
            description_body: body.trim().to_string(),
            diff: diff.to_string(),
            has_three_dash,
            author: None,
            date: None,
            subject: None,
            fixes: Vec::new(),
        };
        doc.parse_header();
        doc.parse_body();
        doc
    }

    fn parse_header(&mut self) {
        for line in self.raw_header.lines() {
            if let Some(author) = line.strip_prefix("From: ") {
                self.author = Some(author.trim().to_string());
            }
            if let Some(date) = line.strip_prefix("Date: ") {
                self.date = Some(date.trim().to_string());
            }
            if self.subject.is_some() {
                continue;
            }
            if let Some(caps) = BRACKETED_SUBJECT.captures(line) {
                self.subject = Some(caps[1].trim().to_string());
            } else if let Some(subject) = line.strip_prefix("Subject: ") {
                self.subject = Some(subject.to_string());
            }
        }
    }

    fn parse_body(&mut self) {
        for line in self.description_body.lines() {
            // Forwarded mails carry the real author as the first body line.
            if let Some(author) = line.strip_prefix("From: ") {
                self.author = Some(author.trim().to_string());
            }
            if let Some(fixes) = line.strip_prefix("Fixes: ") {
                self.fixes.push(fixes.trim().to_string());
            }
        }
    }

    /// Render the document back to patch text.
    pub fn to_text(&self) -> String {
        if self.has_three_dash {
            format!("{}\n\n{}\n\n---\n{}", self.raw_header, self.description_body, self.diff)
        } else {
            format!("{}\n\n{}\n\ndiff --git{}", self.raw_header, self.description_body, self.diff)
        }
    }

    pub fn identity(&self) -> ChangeIdentity {
        ChangeIdentity {
            author: self.author.clone(),
            subject: self.subject.clone(),
            fixes: self.fixes.clone(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn raw_header(&self) -> &str {
        &self.raw_header
    }

    pub fn description_body(&self) -> &str {
        &self.description_body
    }

    pub fn diff(&self) -> &str {
        &self.diff
    }

    pub fn has_three_dash(&self) -> bool {
        self.has_three_dash
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn fixes(&self) -> &[String] {
        &self.fixes
    }
}

impl PartialEq for PatchDocument {
    fn eq(&self, other: &Self) -> bool {
        self.author == other.author && self.subject == other.subject && self.fixes == other.fixes
    }
}

impl fmt::Display for PatchDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
