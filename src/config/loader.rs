//! Config file loading

use crate::domain::{BackportStyle, Identity};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

const SECTION: &str = "git-helpers";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// External `find_commit_in` style script; unset uses the built-in search.
    pub find_commit_script: Option<PathBuf>,
    /// Length of commit ids printed by `find-change`.
    pub hash_length: usize,
    /// Styles applied by `backport` when `--style` is not given.
    #[serde(deserialize_with = "deserialize_styles")]
    pub backport_styles: Vec<BackportStyle>,
    pub signoff_name: Option<String>,
    pub signoff_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            find_commit_script: None,
            hash_length: 12,
            backport_styles: Vec::new(),
            signoff_name: None,
            signoff_email: None,
        }
    }
}

impl Config {
    /// Sign-off identity from the config file, when both halves are set.
    pub fn signoff_identity(&self) -> Option<Identity> {
        match (&self.signoff_name, &self.signoff_email) {
            (Some(name), Some(email)) => Some(Identity::new(name, email)),
            (None, None) => None,
            _ => {
                tracing::warn!(
                    "signoff_name and signoff_email must be set together; using git config"
                );
                None
            }
        }
    }
}

/// Accept either `"stable, cherry-pick"` or `["stable", "cherry-pick"]`.
fn deserialize_styles<'de, D>(deserializer: D) -> std::result::Result<Vec<BackportStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        String(String),
        List(Vec<String>),
    }

    let raw = match StringOrList::deserialize(deserializer)? {
        StringOrList::String(s) => crate::utils::split_csv(&s),
        StringOrList::List(items) => items,
    };
    raw.iter().map(|s| s.parse().map_err(serde::de::Error::custom)).collect()
}

pub fn load_config(repo_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(repo_root),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!(path = %config_file.display(), "loaded config");
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            // Auto-discovered: warn and fall back to defaults
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, honouring a nested `[git-helpers]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, honouring a nested `git-helpers:` mapping.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(repo_root: &Path) -> Option<PathBuf> {
    let candidates = [
        "git-helpers.toml",
        ".git-helpers.toml",
        "git-helpers.yml",
        ".git-helpers.yml",
        "git-helpers.yaml",
        ".git-helpers.yaml",
    ];

    candidates.iter().map(|candidate| repo_root.join(candidate)).find(|path| path.exists())
}
