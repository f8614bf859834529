//! Rule-contributing parts: lint, transpile and stylesheet loading.

use buildparts_model::{Fragment, Rule, Stage, TransformStep};
use serde_json::json;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::{require_paths, PartError};

/// Matches `.js` and `.jsx` sources.
pub const SCRIPT_PATTERN: &str = r"\.jsx?$";

/// Matches stylesheets.
pub const STYLE_PATTERN: &str = r"\.css$";

/// Third-party code is never linted or transpiled.
const VENDOR_DIR: &str = "node_modules";

/// Options for [`lint_js`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Directories to lint (at least one)
    pub paths: BTreeSet<PathBuf>,

    /// Report lint errors as warnings instead of failing the build
    pub emit_warnings_only: bool,
}

/// Options for [`transpile_js`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranspileOptions {
    pub paths: BTreeSet<PathBuf>,

    /// Cache transpiler output between builds
    pub cache: bool,
}

/// Options for [`load_css`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssOptions {
    pub paths: BTreeSet<PathBuf>,

    /// Scope class names per module
    pub modules: bool,
}

/// Lint scripts before any other transform runs.
pub fn lint_js(options: &LintOptions) -> Result<Fragment, PartError> {
    require_paths("lint", "paths", &options.paths)?;

    let step = TransformStep::new("eslint")
        .with_option("emitWarning", options.emit_warnings_only)
        .with_option("failOnError", !options.emit_warnings_only);

    let rule = with_includes(Rule::new(SCRIPT_PATTERN), &options.paths)
        .exclude(VENDOR_DIR)
        .stage(Stage::Pre)
        .step(step);

    Ok(Fragment::new("parts::lint_js").with_rule(rule))
}

/// Transpile modern scripts and JSX.
pub fn transpile_js(options: &TranspileOptions) -> Result<Fragment, PartError> {
    require_paths("transpile", "paths", &options.paths)?;

    let step = TransformStep::new("babel")
        .with_option("cacheDirectory", options.cache)
        .with_option("presets", json!(["env", "react"]));

    let rule = with_includes(Rule::new(SCRIPT_PATTERN), &options.paths)
        .exclude(VENDOR_DIR)
        .step(step);

    Ok(Fragment::new("parts::transpile_js").with_rule(rule))
}

/// Load stylesheets: resolve imports, then inject into the page.
pub fn load_css(options: &CssOptions) -> Result<Fragment, PartError> {
    require_paths("css", "paths", &options.paths)?;

    let mut css = TransformStep::new("css").with_option("modules", options.modules);
    if options.modules {
        css = css.with_option("localIdentName", "[name]__[local]___[hash:base64:5]");
    }

    let rule = with_includes(Rule::new(STYLE_PATTERN), &options.paths)
        .step(css)
        .step(TransformStep::new("style"));

    Ok(Fragment::new("parts::load_css").with_rule(rule))
}

fn with_includes(rule: Rule, paths: &BTreeSet<PathBuf>) -> Rule {
    paths.iter().fold(rule, |rule, path| rule.include(path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src() -> BTreeSet<PathBuf> {
        BTreeSet::from([PathBuf::from("src")])
    }

    fn only_rule(fragment: &Fragment) -> &Rule {
        let rules = fragment.settings.rules.as_ref().expect("rules");
        assert_eq!(rules.len(), 1);
        &rules[0]
    }

    #[test]
    fn test_lint_warn_mode() {
        let fragment = lint_js(&LintOptions {
            paths: src(),
            emit_warnings_only: true,
        })
        .unwrap();
        let rule = only_rule(&fragment);

        assert_eq!(rule.pattern, SCRIPT_PATTERN);
        assert_eq!(rule.stage, Stage::Pre);
        assert!(rule.include_paths.contains(&PathBuf::from("src")));
        assert!(rule.exclude_paths.contains(&PathBuf::from("node_modules")));
        assert_eq!(rule.transform_chain[0].name, "eslint");
        assert_eq!(rule.transform_chain[0].options["emitWarning"], true);
        assert_eq!(rule.transform_chain[0].options["failOnError"], false);
    }

    #[test]
    fn test_lint_fail_mode() {
        let fragment = lint_js(&LintOptions {
            paths: src(),
            emit_warnings_only: false,
        })
        .unwrap();
        let step = &only_rule(&fragment).transform_chain[0];

        assert_eq!(step.options["emitWarning"], false);
        assert_eq!(step.options["failOnError"], true);
    }

    #[test]
    fn test_lint_touches_only_rules() {
        let fragment = lint_js(&LintOptions {
            paths: src(),
            emit_warnings_only: true,
        })
        .unwrap();
        assert_eq!(fragment.settings.present_fields(), vec!["rules"]);
    }

    #[test]
    fn test_lint_requires_paths() {
        let err = lint_js(&LintOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PartError::InvalidOption {
                concern: "lint",
                option: "paths",
                ..
            }
        ));
    }

    #[test]
    fn test_transpile_is_normal_stage() {
        let fragment = transpile_js(&TranspileOptions {
            paths: src(),
            cache: true,
        })
        .unwrap();
        let rule = only_rule(&fragment);

        assert_eq!(rule.stage, Stage::Normal);
        assert_eq!(rule.transform_chain[0].name, "babel");
        assert_eq!(rule.transform_chain[0].options["cacheDirectory"], true);
    }

    #[test]
    fn test_css_chain_order() {
        let fragment = load_css(&CssOptions {
            paths: src(),
            modules: true,
        })
        .unwrap();
        let rule = only_rule(&fragment);
        let names: Vec<&str> = rule.transform_chain.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(rule.pattern, STYLE_PATTERN);
        assert_eq!(names, vec!["css", "style"]);
        assert!(rule.transform_chain[0].options.contains_key("localIdentName"));
    }

    #[test]
    fn test_css_requires_paths() {
        assert!(load_css(&CssOptions::default()).is_err());
        assert!(transpile_js(&TranspileOptions::default()).is_err());
    }
}
