//! Lenient file reading.
//!
//! Patch files come from mail archives and old trees, so they regularly carry
//! stray Latin-1 bytes or truncated multi-byte sequences. Reading never fails
//! on content: invalid sequences become U+FFFD.

use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use std::path::Path;

/// Decode bytes as UTF-8, replacing invalid sequences.
///
/// A leading BOM is kept as-is rather than stripped, so the decoded text
/// matches the file byte-for-byte wherever it was valid.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let (decoded, had_errors) = UTF_8.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!("replaced invalid UTF-8 sequences while decoding");
    }
    decoded.into_owned()
}

/// Read a file and decode it with [`decode_lossy`].
///
/// Only I/O failures (missing file, permissions) are errors.
pub fn read_file_lossy(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(decode_lossy(&bytes))
}
