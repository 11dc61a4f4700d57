//! Manifest types for extension metadata
//!
//! The manifest is the explicit, enumerable contract between the host and
//! its precompiled extensions: which extensions exist, where their shared
//! libraries live, which host ABI they were built against, and exactly
//! which names they export. The loader cross-checks a loaded extension
//! against its manifest entry instead of discovering symbols by
//! introspection.

use serde::{Deserialize, Serialize};

/// Main manifest structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub generated_at: String,
    pub extensions: Vec<ExtensionEntry>,
}

impl Manifest {
    /// Get an extension entry by name
    pub fn get_extension(&self, name: &str) -> Option<&ExtensionEntry> {
        self.extensions.iter().find(|ext| ext.name == name)
    }

    /// Parse manifest from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize manifest to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Extension entry in manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionEntry {
    pub name: String,
    pub version: String,
    /// Host ABI version requirement, e.g. "1.0.0"
    pub api_version: String,
    /// Path to the shared library, relative to the extension directory
    pub path: String,
    /// Declared public symbol names of the extension's root namespace
    pub exports: Vec<String>,
}

impl ExtensionEntry {
    /// Whether the entry declares `name` among its exports
    pub fn declares_export(&self, name: &str) -> bool {
        self.exports.iter().any(|export| export == name)
    }
}
