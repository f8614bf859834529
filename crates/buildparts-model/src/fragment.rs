//! Fragments and resolved configurations
//!
//! A [`Fragment`] is a partial configuration contributed by one concern. A
//! [`Configuration`] is the result of folding fragments together. Both carry
//! the same [`Settings`] shape; every field is optional so that "absent" and
//! "explicitly empty" stay distinguishable through a merge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::rule::{Plugin, Rule};

/// Entry name the bundler uses for the single-path shorthand.
pub const DEFAULT_ENTRY_NAME: &str = "main";

/// Entry points.
///
/// Deserializes from either a bare string or a table of named entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// One unnamed entry path
    Single(String),
    /// Logical entry name -> source path
    Named(BTreeMap<String, String>),
}

impl Entry {
    /// Human-readable shape name, used in mismatch errors.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Single(_) => "single path",
            Self::Named(_) => "mapping",
        }
    }

    /// Entry names paired with their source paths.
    ///
    /// The single-path form is reported under [`DEFAULT_ENTRY_NAME`].
    pub fn points(&self) -> Vec<(&str, &str)> {
        match self {
            Self::Single(path) => vec![(DEFAULT_ENTRY_NAME, path.as_str())],
            Self::Named(map) => map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect(),
        }
    }
}

/// Output target descriptor. Every field merges independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Output {
    /// Filename pattern; `[name]` is replaced by the entry name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

/// Dev-server console verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatsLevel {
    None,
    ErrorsOnly,
    Minimal,
    Normal,
    Verbose,
}

impl fmt::Display for StatsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::ErrorsOnly => write!(f, "errors-only"),
            Self::Minimal => write!(f, "minimal"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

/// Development server options. Every field merges independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Inline live-reload client instead of an iframe wrapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,

    /// gzip responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hot: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsLevel>,
}

/// The mergeable body shared by fragments and configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Base directory that relative entry paths resolve against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Output>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Plugin>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServer>,
}

impl Settings {
    /// True when no field is set at all.
    pub fn is_empty(&self) -> bool {
        self.context.is_none()
            && self.entry.is_none()
            && self.output.is_none()
            && self.rules.is_none()
            && self.plugins.is_none()
            && self.dev_server.is_none()
    }

    /// Names of the top-level fields that are set.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.context.is_some() {
            fields.push("context");
        }
        if self.entry.is_some() {
            fields.push("entry");
        }
        if self.output.is_some() {
            fields.push("output");
        }
        if self.rules.is_some() {
            fields.push("rules");
        }
        if self.plugins.is_some() {
            fields.push("plugins");
        }
        if self.dev_server.is_some() {
            fields.push("devServer");
        }
        fields
    }
}

/// An immutable partial configuration produced by one concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Label of the concern or file that produced this fragment
    pub source: String,

    pub settings: Settings,
}

impl Fragment {
    /// Create a fragment with no fields set.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            settings: Settings::default(),
        }
    }

    pub fn from_settings(source: impl Into<String>, settings: Settings) -> Self {
        Self {
            source: source.into(),
            settings,
        }
    }

    pub fn with_context(mut self, context: impl Into<PathBuf>) -> Self {
        self.settings.context = Some(context.into());
        self
    }

    /// Add a named entry, switching the entry field to its mapping form.
    ///
    /// A previously set single-path entry is kept under [`DEFAULT_ENTRY_NAME`].
    pub fn with_entry(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        let mut map = match self.settings.entry.take() {
            Some(Entry::Named(map)) => map,
            Some(Entry::Single(existing)) => {
                BTreeMap::from([(DEFAULT_ENTRY_NAME.to_string(), existing)])
            }
            None => BTreeMap::new(),
        };
        map.insert(name.into(), path.into());
        self.settings.entry = Some(Entry::Named(map));
        self
    }

    pub fn with_single_entry(mut self, path: impl Into<String>) -> Self {
        self.settings.entry = Some(Entry::Single(path.into()));
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.settings.output = Some(output);
        self
    }

    /// Append a rule, turning an absent rule list into a present one.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.settings.rules.get_or_insert_with(Vec::new).push(rule);
        self
    }

    /// Mark the rule list as present but empty.
    pub fn with_no_rules(mut self) -> Self {
        self.settings.rules = Some(Vec::new());
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.settings.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    pub fn with_dev_server(mut self, dev_server: DevServer) -> Self {
        self.settings.dev_server = Some(dev_server);
        self
    }
}

/// The merge result handed to the bundler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    #[serde(flatten)]
    pub settings: Settings,

    /// Sources of the contributing fragments, in merge order
    pub sources: Vec<String>,

    /// Field path -> source whose value survived the merge
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub origins: BTreeMap<String, String>,
}

impl Configuration {
    /// The configuration produced by merging zero fragments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap this configuration as a single fragment for a further merge.
    pub fn into_fragment(self, source: impl Into<String>) -> Fragment {
        Fragment::from_settings(source, self.settings)
    }

    /// Rules in merge order (empty if absent).
    pub fn rules(&self) -> &[Rule] {
        self.settings.rules.as_deref().unwrap_or(&[])
    }

    /// Plugins in merge order (empty if absent).
    pub fn plugins(&self) -> &[Plugin] {
        self.settings.plugins.as_deref().unwrap_or(&[])
    }

    /// Which fragment set a given field path, if any.
    pub fn origin_of(&self, field: &str) -> Option<&str> {
        self.origins.get(field).map(String::as_str)
    }
}
