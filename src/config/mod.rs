//! Configuration loading
//!
//! Settings come from an optional file in the repository root, then CLI flags
//! override them (CLI > File > Defaults).

pub mod loader;

pub use loader::{load_config, Config};
