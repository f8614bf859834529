//! Staged rule evaluation

use buildparts_model::{Configuration, Rule, Stage, TransformStep};
use regex_lite::Regex;
use std::path::{Component, Path, PathBuf};

use super::BundleError;

struct CompiledRule<'a> {
    rule: &'a Rule,
    matcher: Regex,
}

/// Rules of a configuration, compiled and ordered by stage.
pub struct RulePlan<'a> {
    rules: Vec<CompiledRule<'a>>,
}

impl<'a> RulePlan<'a> {
    /// Compile every rule pattern and order rules by stage.
    ///
    /// The sort is stable, so rules within a stage keep their merge order.
    pub fn new(config: &'a Configuration) -> Result<Self, BundleError> {
        let mut rules = config
            .rules()
            .iter()
            .map(|rule| {
                let matcher = Regex::new(&rule.pattern).map_err(|e| BundleError::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    reason: e.to_string(),
                })?;
                Ok(CompiledRule { rule, matcher })
            })
            .collect::<Result<Vec<_>, BundleError>>()?;

        rules.sort_by_key(|compiled| compiled.rule.stage);
        Ok(Self { rules })
    }

    /// All rules in evaluation order.
    pub fn ordered(&self) -> Vec<&'a Rule> {
        self.rules.iter().map(|compiled| compiled.rule).collect()
    }

    /// Rules of one stage, in merge order.
    pub fn stage(&self, stage: Stage) -> Vec<&'a Rule> {
        self.rules
            .iter()
            .filter(|compiled| compiled.rule.stage == stage)
            .map(|compiled| compiled.rule)
            .collect()
    }

    /// Rules that apply to a file, in evaluation order.
    pub fn matching(&self, path: &Path) -> Vec<&'a Rule> {
        let path = normalize(path);
        let text = path.to_string_lossy().replace('\\', "/");

        self.rules
            .iter()
            .filter(|compiled| compiled.matcher.is_match(&text) && in_scope(compiled.rule, &path))
            .map(|compiled| compiled.rule)
            .collect()
    }

    /// Transform steps applied to a file, in the order they run.
    pub fn steps_for(&self, path: &Path) -> Vec<&'a TransformStep> {
        self.matching(path)
            .into_iter()
            .flat_map(|rule| rule.transform_chain.iter())
            .collect()
    }
}

fn in_scope(rule: &Rule, path: &Path) -> bool {
    let included = rule.include_paths.is_empty()
        || rule.include_paths.iter().any(|prefix| path.starts_with(normalize(prefix)));
    let excluded = rule.exclude_paths.iter().any(|prefix| path.starts_with(normalize(prefix)));
    included && !excluded
}

/// Drop `.` components so `./src/a.js` and `src/a.js` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
