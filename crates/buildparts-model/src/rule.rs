//! Module rules and plugins.
//!
//! Rules select files by pattern and path prefixes and name the transform
//! chain the bundler runs over them. Plugins are opaque named units with an
//! options mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Evaluation bucket for a rule.
///
/// The bundler runs every `pre` rule before any `normal` rule, and every
/// `normal` rule before any `post` rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Pre,
    #[default]
    Normal,
    Post,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => write!(f, "pre"),
            Self::Normal => write!(f, "normal"),
            Self::Post => write!(f, "post"),
        }
    }
}

/// One step of a transform chain (a loader name plus its options).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformStep {
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

impl TransformStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Set an option, replacing any previous value for the key.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// A transform-selection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Rule {
    /// Regular expression over file paths. Validity is checked by the consumer.
    pub pattern: String,

    /// Path prefixes a file must live under (empty = no restriction)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub include_paths: BTreeSet<PathBuf>,

    /// Path prefixes that exclude a file even if included
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_paths: BTreeSet<PathBuf>,

    #[serde(default)]
    pub stage: Stage,

    /// Steps applied to a matching file, in listed order
    #[serde(default)]
    pub transform_chain: Vec<TransformStep>,
}

impl Rule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            include_paths: BTreeSet::new(),
            exclude_paths: BTreeSet::new(),
            stage: Stage::Normal,
            transform_chain: Vec::new(),
        }
    }

    pub fn include(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.insert(path.into());
        self
    }

    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude_paths.insert(path.into());
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Append a step to the end of the transform chain.
    pub fn step(mut self, step: TransformStep) -> Self {
        self.transform_chain.push(step);
        self
    }
}

/// A named plugin instance.
///
/// Plugins have no identity beyond their position in the sequence: two
/// plugins with the same name are two separate instances and both are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plugin {
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}
