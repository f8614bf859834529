//! Resolved configuration with provenance
//!
//! The envelope handed to the bundler: the merged configuration plus the
//! mode it was built for and every fragment source that contributed.

use buildparts_model::Configuration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

use crate::env::Mode;

/// Schema version for the resolved envelope
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "buildparts/resolved_config@1";

/// Where a contributing fragment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Built by a part constructor
    Part,
    /// Loaded from a fragment file
    File,
}

/// A contributing fragment with provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub kind: SourceKind,

    /// Fragment source label
    pub label: String,

    /// SHA-256 digest of raw file bytes (None for parts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl SourceRecord {
    pub fn part(label: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Part,
            label: label.into(),
            digest: None,
        }
    }

    pub fn file(label: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::File,
            label: label.into(),
            digest: Some(digest.into()),
        }
    }
}

/// Resolved configuration envelope
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this configuration was assembled
    pub created_at: DateTime<Utc>,

    pub mode: Mode,

    /// The merged configuration
    pub config: Configuration,

    /// Contributing sources in merge order
    pub sources: Vec<SourceRecord>,
}

impl ResolvedConfig {
    pub fn new(mode: Mode, config: Configuration, sources: Vec<SourceRecord>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            mode,
            config,
            sources,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get a configuration value by dot-separated path.
    ///
    /// Numeric segments index into sequences, e.g. `rules.0.stage`.
    pub fn get(&self, path: &str) -> Option<Value> {
        let root = serde_json::to_value(&self.config).ok()?;
        path.split('.').try_fold(root, |current, part| match part.parse::<usize>() {
            Ok(index) if current.is_array() => current.get(index).cloned(),
            _ => current.get(part).cloned(),
        })
    }
}
