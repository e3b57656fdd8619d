//! Backport provenance decoration

use super::PatchDocument;
use crate::domain::{BackportStyle, CommitId, Identity};
use crate::error::Result;

/// Supplies the identity used for `Signed-off-by:` lines.
pub trait IdentitySource {
    fn signer_identity(&self) -> Result<Identity>;
}

impl IdentitySource for Identity {
    fn signer_identity(&self) -> Result<Identity> {
        Ok(self.clone())
    }
}

/// Add upstream provenance and a sign-off to the patch description.
///
/// The result is `[stable line] + body + [sign-off] + [cherry-pick line]`,
/// joined as separate paragraphs. Every existence check looks at the body as
/// it was before this call, so running the decoration again with the same
/// arguments leaves the body untouched.
pub fn decorate_for_backport(
    patch: &mut PatchDocument,
    upstream: &CommitId,
    styles: &[BackportStyle],
    signer: &dyn IdentitySource,
) -> Result<()> {
    let original = patch.description_body.trim().to_string();
    let lines: Vec<&str> = original.lines().collect();
    let has_line = |candidate: &str| lines.iter().any(|line| *line == candidate);

    let mut pieces: Vec<String> = Vec::new();

    if styles.contains(&BackportStyle::Stable) {
        let stable_line = format!("commit {upstream} upstream.");
        if !has_line(&stable_line) {
            pieces.push(stable_line);
        }
    }

    if !original.is_empty() {
        pieces.push(original.clone());
    }

    let signed_off_by = signer.signer_identity()?.signed_off_by();
    let cherry_pick_line = format!("(cherry picked from commit {upstream})");
    if !ends_with_sign_off(&lines, &signed_off_by, &cherry_pick_line) {
        pieces.push(signed_off_by);
    }

    if styles.contains(&BackportStyle::CherryPick) && !has_line(&cherry_pick_line) {
        pieces.push(cherry_pick_line);
    }

    tracing::debug!(upstream = %upstream, pieces = pieces.len(), "decorated backport");
    patch.description_body = pieces.join("\n\n");
    Ok(())
}

/// Whether the last non-empty line is the sign-off, looking past a trailing
/// cherry-pick marker for the same upstream commit.
fn ends_with_sign_off(lines: &[&str], signed_off_by: &str, cherry_pick_line: &str) -> bool {
    let mut tail = lines.iter().rev().filter(|line| !line.trim().is_empty());
    match tail.next() {
        Some(last) if *last == signed_off_by => true,
        Some(last) if *last == cherry_pick_line => tail.next() == Some(&signed_off_by),
        _ => false,
    }
}
