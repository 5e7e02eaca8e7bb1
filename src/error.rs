//! Error types for the workflow launcher.

use std::fmt;
use thiserror::Error;

/// Reference taxonomy flavor a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTaxonomyFlavor {
    Dada2,
    Qiime2,
}

impl fmt::Display for RefTaxonomyFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTaxonomyFlavor::Dada2 => write!(f, "DADA2"),
            RefTaxonomyFlavor::Qiime2 => write!(f, "QIIME2"),
        }
    }
}

/// Fatal launch errors; every variant aborts the run
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{}", taxonomy_key_message(.flavor, .key, .valid_keys))]
    MissingTaxonomyKey {
        flavor: RefTaxonomyFlavor,
        key: String,
        valid_keys: Vec<String>,
    },

    #[error("Parameter validation failed:\n  - {}", .0.join("\n  - "))]
    InvalidParameters(Vec<String>),

    #[error("Profile configuration error: {0}")]
    NoProfileConfigured(String),

    #[error("Conda channel error: {0}")]
    CondaChannelOrder(String),

    #[error("AWS Batch configuration error: {0}")]
    BatchConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    /// Build a MissingTaxonomyKey error from a lookup table's key set.
    pub fn missing_taxonomy_key<'a>(
        flavor: RefTaxonomyFlavor,
        key: &str,
        valid_keys: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        LaunchError::MissingTaxonomyKey {
            flavor,
            key: key.to_string(),
            valid_keys: valid_keys.into_iter().cloned().collect(),
        }
    }
}

/// Boxed message naming the offending key and enumerating the valid ones.
fn taxonomy_key_message(flavor: &RefTaxonomyFlavor, key: &str, valid_keys: &[String]) -> String {
    let rule = "=".repeat(85);
    format!(
        "{rule}\n  The {flavor} reference taxonomy '{key}' was not found in the reference database catalog.\n  Currently, the available reference taxonomy keys are:\n  {}\n{rule}",
        valid_keys.join(", ")
    )
}

impl From<config::ConfigError> for LaunchError {
    fn from(err: config::ConfigError) -> Self {
        LaunchError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for LaunchError {
    fn from(err: toml::de::Error) -> Self {
        LaunchError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LaunchError {
    fn from(err: serde_json::Error) -> Self {
        LaunchError::Config(err.to_string())
    }
}
