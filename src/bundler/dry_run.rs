//! Dry-run bundler: reports what a bundler would do without compiling.

use buildparts_model::{Configuration, Stage};
use serde::Serialize;
use std::path::PathBuf;

use super::{BundleError, Bundler, RulePlan};

/// Filename pattern used when the configuration sets none.
pub const DEFAULT_FILENAME: &str = "[name].js";

/// Transform plan for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePlan {
    pub path: PathBuf,

    /// `stage:step` labels in the order they run
    pub steps: Vec<String>,
}

/// What the bundler would do with a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunReport {
    pub files: Vec<FilePlan>,

    /// Plugin names in hook order
    pub plugins: Vec<String>,

    /// Bundle files that would be emitted, one per entry
    pub emitted: Vec<PathBuf>,
}

impl DryRunReport {
    /// Format as human-readable text.
    pub fn to_human(&self) -> String {
        let mut out = String::new();

        for file in &self.files {
            if file.steps.is_empty() {
                out.push_str(&format!("{}: (no rules)\n", file.path.display()));
            } else {
                out.push_str(&format!("{}: {}\n", file.path.display(), file.steps.join(" -> ")));
            }
        }

        if !self.plugins.is_empty() {
            out.push_str(&format!("plugins: {}\n", self.plugins.join(", ")));
        }

        for path in &self.emitted {
            out.push_str(&format!("emit: {}\n", path.display()));
        }

        out
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Bundler that only plans
#[derive(Debug, Clone, Default)]
pub struct DryRunBundler {
    /// Input files to plan, relative to the project root
    pub files: Vec<PathBuf>,
}

impl DryRunBundler {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl Bundler for DryRunBundler {
    type Output = DryRunReport;

    fn bundle(&self, config: &Configuration) -> Result<DryRunReport, BundleError> {
        let plan = RulePlan::new(config)?;

        let files = self
            .files
            .iter()
            .map(|path| FilePlan {
                path: path.clone(),
                steps: plan
                    .matching(path)
                    .into_iter()
                    .flat_map(|rule| {
                        rule.transform_chain
                            .iter()
                            .map(move |step| step_label(rule.stage, &step.name))
                    })
                    .collect(),
            })
            .collect();

        let plugins = config.plugins().iter().map(|p| p.name.clone()).collect();

        Ok(DryRunReport {
            files,
            plugins,
            emitted: emitted_files(config),
        })
    }
}

fn step_label(stage: Stage, name: &str) -> String {
    format!("{}:{}", stage, name)
}

/// Output files per entry: `[name]` in the filename pattern is replaced by
/// the entry name, and the result is placed under the output directory.
fn emitted_files(config: &Configuration) -> Vec<PathBuf> {
    let Some(entry) = &config.settings.entry else {
        return Vec::new();
    };
    let output = config.settings.output.clone().unwrap_or_default();
    let pattern = output.filename.as_deref().unwrap_or(DEFAULT_FILENAME);
    let dir = output.path.unwrap_or_default();

    entry
        .points()
        .into_iter()
        .map(|(name, _)| dir.join(pattern.replace("[name]", name)))
        .collect()
}
