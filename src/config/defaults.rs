//! Built-in project layout
//!
//! Hardcoded defaults for where sources live, where bundles go and what the
//! base fragment names its entry and output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::parts::BaseOptions;

/// Project layout the selector builds its fragments from.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Source directory (default: "src")
    pub src_dir: PathBuf,

    /// Output directory (default: "dist")
    pub dist_dir: PathBuf,

    /// Entry name -> path relative to `src_dir` (default: main = ./index.js)
    pub entries: BTreeMap<String, String>,

    /// Output filename pattern (default: "[name].bundle.js")
    pub filename: String,

    /// Generated page title (default: "Webpack Demo")
    pub title: Option<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            dist_dir: PathBuf::from("dist"),
            entries: BTreeMap::from([("main".to_string(), "./index.js".to_string())]),
            filename: "[name].bundle.js".to_string(),
            title: Some("Webpack Demo".to_string()),
        }
    }
}

impl Layout {
    /// Options for the base part.
    pub fn base_options(&self) -> BaseOptions {
        BaseOptions {
            context: self.src_dir.clone(),
            entries: self.entries.clone(),
            filename: self.filename.clone(),
            output_dir: self.dist_dir.clone(),
            title: self.title.clone(),
        }
    }

    /// Directories checked by the lint part.
    pub fn lint_paths(&self) -> BTreeSet<PathBuf> {
        BTreeSet::from([self.src_dir.clone()])
    }
}
