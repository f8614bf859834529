//! Fragment constructors ("parts")
//!
//! Each part covers one concern and touches only the fields that concern
//! owns; everything else is left absent. Parts are pure: the same options
//! always produce the same fragment.

mod base;
mod dev_server;
mod rules;

pub use base::{base, BaseOptions};
pub use dev_server::{dev_server, DevServerOptions, DEFAULT_HOST, DEFAULT_PORT};
pub use rules::{load_css, lint_js, transpile_js, CssOptions, LintOptions, TranspileOptions};

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Errors raised while constructing a fragment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartError {
    #[error("invalid option '{option}' for {concern}: {reason}")]
    InvalidOption {
        concern: &'static str,
        option: &'static str,
        reason: String,
    },
}

impl PartError {
    pub(crate) fn invalid(
        concern: &'static str,
        option: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            concern,
            option,
            reason: reason.into(),
        }
    }
}

/// Reject an empty path set for a concern that needs at least one path.
fn require_paths(
    concern: &'static str,
    option: &'static str,
    paths: &BTreeSet<PathBuf>,
) -> Result<(), PartError> {
    if paths.is_empty() {
        return Err(PartError::invalid(concern, option, "at least one path is required"));
    }
    if paths.iter().any(|p| p.as_os_str().is_empty()) {
        return Err(PartError::invalid(concern, option, "paths must not be empty"));
    }
    Ok(())
}
