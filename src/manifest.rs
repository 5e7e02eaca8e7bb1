//! Pipeline manifest and workflow descriptor.
//!
//! The manifest names the pipeline being launched (name, version, description)
//! and is embedded in the binary at build time; a site-specific manifest can
//! be supplied at launch. The descriptor combines the manifest with the
//! execution profiles selected for one invocation.

use crate::error::LaunchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default manifest embedded in the binary at compile time
pub const EMBEDDED_MANIFEST: &str = include_str!("../data/manifest.toml");

/// Pipeline identity as written in the manifest file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl PipelineManifest {
    pub fn embedded() -> Result<Self, LaunchError> {
        Ok(toml::from_str(EMBEDDED_MANIFEST)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LaunchError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Read-only record describing the workflow for one invocation.
#[derive(Debug, Clone)]
pub struct WorkflowDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub profiles: Vec<String>,
}

impl WorkflowDescriptor {
    pub fn new(manifest: &PipelineManifest, profiles: Vec<String>) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            profiles,
        }
    }

    /// Manifest version with a `v` prefix, regardless of how it was authored.
    pub fn version_string(&self) -> String {
        if self.version.starts_with('v') {
            self.version.clone()
        } else {
            format!("v{}", self.version)
        }
    }

    pub fn has_profile(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p == name)
    }
}
