//! git-helpers: recognize the same change across trees and patch queues
//!
//! Parses email-formatted patches, decorates them with backport provenance,
//! and matches a change (author, subject, `Fixes:` references) against commit
//! ranges or other patch files.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod matcher;
pub mod patch;
pub mod timeline;
pub mod utils;
