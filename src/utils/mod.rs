//! Small shared helpers

pub mod encoding;

pub use encoding::{decode_lossy, read_file_lossy};

/// Split a comma-separated string into trimmed, non-empty parts.
pub fn split_csv(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}
