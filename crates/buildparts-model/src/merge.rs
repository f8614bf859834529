//! Fragment merge logic
//!
//! Folds fragments left to right with:
//! - Mappings: union by key (later value wins per key)
//! - Scalars: override (last setter wins, absent never erases)
//! - Records: merged field by field with the scalar rule
//! - Sequences: CONCATENATE (never deduplicated, never reordered)

use std::collections::BTreeMap;

use crate::error::MergeError;
use crate::fragment::{Configuration, DevServer, Entry, Fragment, Output};

/// Merge an ordered sequence of fragments into one configuration.
///
/// Merging zero fragments yields [`Configuration::empty`].
pub fn merge(fragments: &[Fragment]) -> Result<Configuration, MergeError> {
    let config = fragments
        .iter()
        .try_fold(Configuration::empty(), overlay)?;

    tracing::debug!(
        fragments = fragments.len(),
        rules = config.rules().len(),
        plugins = config.plugins().len(),
        "merged configuration"
    );

    Ok(config)
}

/// Apply one fragment on top of a partially merged configuration.
pub fn overlay(
    mut config: Configuration,
    fragment: &Fragment,
) -> Result<Configuration, MergeError> {
    let source = fragment.source.as_str();
    let incoming = &fragment.settings;
    let origins = &mut config.origins;
    let settings = &mut config.settings;

    tracing::debug!(source, fields = ?incoming.present_fields(), "overlaying fragment");

    last_wins(&mut settings.context, &incoming.context, "context", source, origins);

    if let Some(entry) = &incoming.entry {
        merge_entry(&mut settings.entry, entry, source, origins)?;
    }

    if let Some(output) = &incoming.output {
        merge_output(settings.output.get_or_insert_with(Output::default), output, source, origins);
    }

    if let Some(rules) = &incoming.rules {
        settings
            .rules
            .get_or_insert_with(Vec::new)
            .extend(rules.iter().cloned());
    }

    if let Some(plugins) = &incoming.plugins {
        settings
            .plugins
            .get_or_insert_with(Vec::new)
            .extend(plugins.iter().cloned());
    }

    if let Some(dev_server) = &incoming.dev_server {
        merge_dev_server(
            settings.dev_server.get_or_insert_with(DevServer::default),
            dev_server,
            source,
            origins,
        );
    }

    config.sources.push(source.to_string());
    Ok(config)
}

/// Overwrite `slot` when the incoming value is set, recording who set it.
fn last_wins<T: Clone>(
    slot: &mut Option<T>,
    incoming: &Option<T>,
    field: &str,
    source: &str,
    origins: &mut BTreeMap<String, String>,
) {
    if let Some(value) = incoming {
        *slot = Some(value.clone());
        origins.insert(field.to_string(), source.to_string());
    }
}

fn merge_entry(
    slot: &mut Option<Entry>,
    incoming: &Entry,
    source: &str,
    origins: &mut BTreeMap<String, String>,
) -> Result<(), MergeError> {
    match (slot.as_mut(), incoming) {
        (None, _) => *slot = Some(incoming.clone()),
        (Some(Entry::Named(map)), Entry::Named(more)) => {
            for (name, path) in more {
                map.insert(name.clone(), path.clone());
            }
        }
        (Some(Entry::Single(path)), Entry::Single(new_path)) => *path = new_path.clone(),
        (Some(existing), _) => {
            return Err(MergeError::ShapeMismatch {
                field: "entry".to_string(),
                first: origins.get("entry").cloned().unwrap_or_default(),
                first_shape: existing.shape(),
                second: source.to_string(),
                second_shape: incoming.shape(),
            });
        }
    }

    if let Entry::Named(more) = incoming {
        for name in more.keys() {
            origins.insert(format!("entry.{}", name), source.to_string());
        }
    }
    origins.insert("entry".to_string(), source.to_string());
    Ok(())
}

fn merge_output(
    target: &mut Output,
    incoming: &Output,
    source: &str,
    origins: &mut BTreeMap<String, String>,
) {
    last_wins(&mut target.filename, &incoming.filename, "output.filename", source, origins);
    last_wins(&mut target.path, &incoming.path, "output.path", source, origins);
    last_wins(&mut target.public_path, &incoming.public_path, "output.publicPath", source, origins);
}

fn merge_dev_server(
    target: &mut DevServer,
    incoming: &DevServer,
    source: &str,
    origins: &mut BTreeMap<String, String>,
) {
    last_wins(&mut target.host, &incoming.host, "devServer.host", source, origins);
    last_wins(&mut target.port, &incoming.port, "devServer.port", source, origins);
    last_wins(&mut target.inline, &incoming.inline, "devServer.inline", source, origins);
    last_wins(&mut target.compress, &incoming.compress, "devServer.compress", source, origins);
    last_wins(&mut target.hot, &incoming.hot, "devServer.hot", source, origins);
    last_wins(&mut target.stats, &incoming.stats, "devServer.stats", source, origins);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::StatsLevel;
    use crate::rule::{Plugin, Rule, Stage, TransformStep};

    fn output(filename: &str) -> Output {
        Output {
            filename: Some(filename.to_string()),
            ..Default::default()
        }
    }

    fn rule(pattern: &str) -> Rule {
        Rule::new(pattern)
    }

    #[test]
    fn test_empty_merge() {
        let result = merge(&[]).unwrap();
        assert_eq!(result, Configuration::empty());
        assert!(result.settings.is_empty());
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_scalar_override() {
        let a = Fragment::new("a").with_output(output("x"));
        let b = Fragment::new("b").with_output(output("y"));

        let forward = merge(&[a.clone(), b.clone()]).unwrap();
        let backward = merge(&[b, a]).unwrap();

        assert_eq!(forward.settings.output.unwrap().filename.as_deref(), Some("y"));
        assert_eq!(backward.settings.output.unwrap().filename.as_deref(), Some("x"));
        assert_eq!(forward.origins["output.filename"], "b");
    }

    #[test]
    fn test_record_fields_merge_independently() {
        let a = Fragment::new("a").with_output(Output {
            filename: Some("[name].js".to_string()),
            path: Some("dist".into()),
            public_path: None,
        });
        let b = Fragment::new("b").with_output(Output {
            public_path: Some("/assets/".to_string()),
            ..Default::default()
        });

        let result = merge(&[a, b]).unwrap();
        let out = result.settings.output.unwrap();

        // filename and path come from a, public_path from b
        assert_eq!(out.filename.as_deref(), Some("[name].js"));
        assert_eq!(out.path, Some("dist".into()));
        assert_eq!(out.public_path.as_deref(), Some("/assets/"));
        assert_eq!(result.origins["output.path"], "a");
        assert_eq!(result.origins["output.publicPath"], "b");
    }

    #[test]
    fn test_entry_key_override() {
        let a = Fragment::new("a").with_entry("main", "a.js");
        let b = Fragment::new("b")
            .with_entry("main", "b.js")
            .with_entry("extra", "e.js");

        let result = merge(&[a, b]).unwrap();

        let expected = BTreeMap::from([
            ("main".to_string(), "b.js".to_string()),
            ("extra".to_string(), "e.js".to_string()),
        ]);
        assert_eq!(result.settings.entry, Some(Entry::Named(expected)));
        assert_eq!(result.origins["entry.main"], "b");
    }

    #[test]
    fn test_entry_keys_compose_additively() {
        let a = Fragment::new("a").with_entry("main", "./index.js");
        let b = Fragment::new("b").with_entry("debug", "./debug.js");

        let result = merge(&[a, b]).unwrap();
        let points = result.settings.entry.unwrap();
        assert_eq!(points.points(), vec![("debug", "./debug.js"), ("main", "./index.js")]);
        assert_eq!(result.origins["entry.main"], "a");
        assert_eq!(result.origins["entry.debug"], "b");
    }

    #[test]
    fn test_single_entry_last_wins() {
        let a = Fragment::new("a").with_single_entry("./a.js");
        let b = Fragment::new("b").with_single_entry("./b.js");

        let result = merge(&[a, b]).unwrap();
        assert_eq!(result.settings.entry, Some(Entry::Single("./b.js".to_string())));
    }

    #[test]
    fn test_entry_shape_mismatch() {
        let a = Fragment::new("parts::base").with_entry("main", "./index.js");
        let b = Fragment::new("override.toml").with_single_entry("./other.js");

        let err = merge(&[a, b]).unwrap_err();
        assert_eq!(
            err,
            MergeError::ShapeMismatch {
                field: "entry".to_string(),
                first: "parts::base".to_string(),
                first_shape: "mapping",
                second: "override.toml".to_string(),
                second_shape: "single path",
            }
        );
        let message = err.to_string();
        assert!(message.contains("entry"));
        assert!(message.contains("parts::base"));
        assert!(message.contains("override.toml"));
    }

    #[test]
    fn test_absent_field_does_not_erase() {
        let dev = DevServer {
            host: Some("localhost".to_string()),
            port: Some(8080),
            ..Default::default()
        };
        let a = Fragment::new("a").with_dev_server(dev.clone());
        let b = Fragment::new("b").with_context("src");

        let result = merge(&[a, b]).unwrap();
        assert_eq!(result.settings.dev_server, Some(dev));
        assert_eq!(result.origins["devServer.port"], "a");
    }

    #[test]
    fn test_dev_server_per_field_merge() {
        let a = Fragment::new("a").with_dev_server(DevServer {
            host: Some("localhost".to_string()),
            port: Some(8080),
            stats: Some(StatsLevel::ErrorsOnly),
            ..Default::default()
        });
        let b = Fragment::new("b").with_dev_server(DevServer {
            port: Some(3000),
            compress: Some(true),
            ..Default::default()
        });

        let merged = merge(&[a, b]).unwrap().settings.dev_server.unwrap();
        assert_eq!(merged.host.as_deref(), Some("localhost"));
        assert_eq!(merged.port, Some(3000));
        assert_eq!(merged.compress, Some(true));
        assert_eq!(merged.stats, Some(StatsLevel::ErrorsOnly));
        assert_eq!(merged.inline, None);
    }

    #[test]
    fn test_sequences_concatenate() {
        let a = Fragment::new("a").with_rule(rule("a1")).with_rule(rule("a2"));
        let b = Fragment::new("b").with_rule(rule("b1").stage(Stage::Pre));
        let c = Fragment::new("c").with_rule(rule("a1"));

        let result = merge(&[a, b, c]).unwrap();
        let patterns: Vec<&str> = result.rules().iter().map(|r| r.pattern.as_str()).collect();

        // No staging, no dedup: duplicates and pre rules stay where they were supplied
        assert_eq!(patterns, vec!["a1", "a2", "b1", "a1"]);
    }

    #[test]
    fn test_plugins_keep_duplicates_in_order() {
        let a = Fragment::new("a").with_plugin(Plugin::new("html").with_option("title", "one"));
        let b = Fragment::new("b").with_plugin(Plugin::new("html").with_option("title", "two"));

        let result = merge(&[a, b]).unwrap();
        let plugins = result.plugins();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].options["title"], "one");
        assert_eq!(plugins[1].options["title"], "two");
    }

    #[test]
    fn test_explicitly_empty_sequence_survives() {
        let a = Fragment::new("a").with_context("src");
        let b = Fragment::new("b").with_no_rules();

        let result = merge(&[a, b]).unwrap();
        assert_eq!(result.settings.rules, Some(Vec::new()));
        assert!(result.settings.plugins.is_none());
    }

    #[test]
    fn test_associativity() {
        let a = Fragment::new("a")
            .with_rule(rule("a"))
            .with_output(output("a.js"))
            .with_entry("main", "./a.js");
        let b = Fragment::new("b")
            .with_rule(rule("b").step(TransformStep::new("babel")))
            .with_entry("other", "./b.js");
        let c = Fragment::new("c")
            .with_rule(rule("c"))
            .with_output(output("c.js"));

        let flat = merge(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let ab = merge(&[a.clone(), b.clone()]).unwrap().into_fragment("ab");
        let bc = merge(&[b.clone(), c.clone()]).unwrap().into_fragment("bc");
        let nested_left = merge(&[ab, c.clone()]).unwrap();
        let nested_right = merge(&[a.clone(), bc]).unwrap();

        let expected: Vec<Rule> = [a, b, c]
            .iter()
            .flat_map(|f| f.settings.rules.clone().unwrap_or_default())
            .collect();

        assert_eq!(flat.rules(), expected.as_slice());
        assert_eq!(flat.settings, nested_left.settings);
        assert_eq!(flat.settings, nested_right.settings);
    }

    #[test]
    fn test_singleton_and_remerge_identity() {
        let f = Fragment::new("f")
            .with_context("src")
            .with_entry("main", "./index.js")
            .with_output(output("[name].bundle.js"))
            .with_rule(rule(r"\.css$"))
            .with_plugin(Plugin::new("html"));

        let once = merge(std::slice::from_ref(&f)).unwrap();
        assert_eq!(once.settings, f.settings);
        assert_eq!(once.sources, vec!["f".to_string()]);

        let twice = merge(&[once.clone().into_fragment("resolved")]).unwrap();
        assert_eq!(twice.settings, once.settings);
    }

    #[test]
    fn test_deterministic() {
        let fragments = vec![
            Fragment::new("a").with_entry("main", "./index.js").with_rule(rule("x")),
            Fragment::new("b").with_output(output("out.js")).with_plugin(Plugin::new("p")),
        ];

        let first = merge(&fragments).unwrap();
        let second = merge(&fragments).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
