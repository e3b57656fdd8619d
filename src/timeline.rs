//! Cross-tree timeline of a change
//!
//! For every tree that contains the change, two events are recorded: when it
//! was authored and when it was committed into that tree. Identical events at
//! the same timestamp collapse into one, so a change that was merged into
//! several trees unmodified is "authored" only once.

use crate::git::{CommitMetadataSource, CommitSearch};
use crate::matcher::Change;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Events keyed by ISO-8601 date, in discovery order within a date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    events: BTreeMap<String, Vec<String>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` at `date` unless the exact pair is already present.
    pub fn append(&mut self, date: &str, event: String) {
        let events = self.events.entry(date.to_string()).or_default();
        if !events.contains(&event) {
            events.push(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All `(date, event)` pairs, dates ascending.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.events
            .iter()
            .flat_map(|(date, events)| events.iter().map(move |e| (date.as_str(), e.as_str())))
    }

    /// Day headers followed by indented `time: event` lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut last_day: Option<&str> = None;
        for (date, event) in self.iter() {
            let (day, time) = date.split_once('T').unwrap_or((date, ""));
            if last_day != Some(day) {
                out.push_str(day);
                out.push('\n');
                last_day = Some(day);
            }
            out.push_str(&format!("    {time}: {event}\n"));
        }
        out
    }
}

/// Build the timeline of `change` across `trees`, in tree order.
///
/// Trees where the change is absent are skipped. So are trees the search
/// could not be run against: they are logged and the walk continues.
pub fn build_timeline(
    change: &Change,
    trees: &[String],
    search: &dyn CommitSearch,
    metadata: &dyn CommitMetadataSource,
) -> Result<Timeline> {
    let mut timeline = Timeline::new();
    for tree in trees {
        let id = match change.find_matching_commit(search, tree) {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!(tree = %tree, "change not found in tree");
                continue;
            }
            Err(e) => {
                tracing::warn!("Skipping tree {}: {}", tree, e);
                continue;
            }
        };

        let meta = metadata
            .commit_metadata(&id)
            .with_context(|| format!("Failed to read commit {id} found in {tree}"))?;
        timeline.append(&meta.author.date, format!("authored by {}", meta.author.who));
        timeline
            .append(&meta.committer.date, format!("committed by {} into {}", meta.committer.who, tree));
    }
    Ok(timeline)
}
