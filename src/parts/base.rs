//! Base part: context, entry points, output target and the HTML page plugin.

use buildparts_model::{Fragment, Output, Plugin};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::PartError;

const CONCERN: &str = "base";

/// Options for [`base`].
#[derive(Debug, Clone, PartialEq)]
pub struct BaseOptions {
    /// Source directory; entry paths are relative to it
    pub context: PathBuf,

    /// Entry name -> path relative to `context` (at least one)
    pub entries: BTreeMap<String, String>,

    /// Output filename pattern, e.g. `[name].bundle.js`
    pub filename: String,

    /// Output directory
    pub output_dir: PathBuf,

    /// Title for the generated HTML page. No page plugin when unset.
    pub title: Option<String>,
}

/// Build the base fragment.
pub fn base(options: &BaseOptions) -> Result<Fragment, PartError> {
    if options.entries.is_empty() {
        return Err(PartError::invalid(CONCERN, "entries", "at least one entry is required"));
    }
    if let Some((name, _)) = options.entries.iter().find(|(_, path)| path.trim().is_empty()) {
        return Err(PartError::invalid(
            CONCERN,
            "entries",
            format!("entry '{}' has an empty path", name),
        ));
    }
    if options.filename.trim().is_empty() {
        return Err(PartError::invalid(CONCERN, "filename", "filename pattern must not be empty"));
    }

    let mut fragment = Fragment::new("parts::base")
        .with_context(options.context.clone())
        .with_output(Output {
            filename: Some(options.filename.clone()),
            path: Some(options.output_dir.clone()),
            public_path: None,
        });

    for (name, path) in &options.entries {
        fragment = fragment.with_entry(name.clone(), path.clone());
    }

    if let Some(title) = &options.title {
        fragment = fragment.with_plugin(Plugin::new("html").with_option("title", title.clone()));
    }

    Ok(fragment)
}
