//! Fragment files
//!
//! A fragment file is a TOML or JSON document with the same shape as the
//! resolved configuration (`context`, `entry`, `output`, `rules`, `plugins`,
//! `devServer`). Each file becomes one fragment labelled with its path.

use buildparts_model::{Fragment, Settings};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading a fragment file
#[derive(Debug, thiserror::Error)]
pub enum FragmentFileError {
    #[error("failed to read fragment file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse fragment file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Supported fragment file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A loaded fragment file with provenance
#[derive(Debug, Clone)]
pub struct FragmentFile {
    pub path: PathBuf,

    /// SHA-256 of the raw file bytes
    pub digest: String,

    pub fragment: Fragment,
}

impl FragmentFile {
    /// Load and parse a fragment file.
    pub fn load(path: &Path) -> Result<Self, FragmentFileError> {
        let format = FileFormat::from_path(path).ok_or_else(|| FragmentFileError::Parse {
            path: path.to_path_buf(),
            message: "unsupported extension (expected .toml or .json)".to_string(),
        })?;

        let bytes = fs::read(path).map_err(|source| FragmentFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let digest = hex::encode(Sha256::digest(&bytes));

        let contents = String::from_utf8(bytes).map_err(|e| FragmentFileError::Parse {
            path: path.to_path_buf(),
            message: format!("invalid UTF-8: {}", e),
        })?;

        let settings = Self::parse(&contents, format).map_err(|message| FragmentFileError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        if settings.is_empty() {
            tracing::warn!(path = %path.display(), "fragment file sets no fields");
        } else {
            tracing::debug!(
                path = %path.display(),
                fields = ?settings.present_fields(),
                "loaded fragment file"
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            digest,
            fragment: Fragment::from_settings(path.display().to_string(), settings),
        })
    }

    /// Parse fragment settings from a string.
    pub fn parse(contents: &str, format: FileFormat) -> Result<Settings, String> {
        match format {
            FileFormat::Toml => {
                toml::from_str(contents).map_err(|e| format!("TOML parse error: {}", e))
            }
            FileFormat::Json => {
                serde_json::from_str(contents).map_err(|e| format!("JSON parse error: {}", e))
            }
        }
    }
}
