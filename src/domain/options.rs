//! Pure sanitation of list and article option mappings.
//!
//! The defaults and gating rules are explicit parameters so the filtering
//! behavior can be tested without touching the rest of the store.

use serde_json::Value;

use crate::domain::entities::OptionsMap;

/// Option keys that only carry meaning while their gate option is truthy.
#[derive(Debug, Clone, Copy)]
pub struct DependentOptionRule {
    pub gate: &'static str,
    pub dependents: &'static [&'static str],
}

/// Gating rules applied to article options before they are persisted.
pub const ARTICLE_OPTION_RULES: &[DependentOptionRule] = &[
    DependentOptionRule {
        gate: "streamer",
        dependents: &[
            "streamer_type",
            "streamer_content",
            "streamer_color",
            "streamer_image",
        ],
    },
    DependentOptionRule {
        gate: "sticky",
        dependents: &["sticky_pos", "sticky_interval"],
    },
];

/// Defaults merged under caller options when a list is created.
pub const LIST_CREATE_DEFAULTS: &[(&str, &str)] = &[
    ("previewtemplate", "article"),
    ("before_title", "<h2>"),
    ("after_title", "</h2>"),
    ("pagestopurge", ""),
];

/// Recognized list options and their fallback values, enforced when list
/// metadata is sanitized before a save. Keys outside this table are dropped.
pub const LIST_SANITIZE_DEFAULTS: &[(&str, &str)] = &[
    ("previewpage", "/"),
    ("previewtemplate", "article"),
    ("before_title", "<h2>"),
    ("after_title", "</h2>"),
    ("pagestopurge", ""),
];

/// Loose falsiness used for option gates: null, false, zero, the empty
/// string, the literal `"0"` and empty arrays all count as unset.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Strip dependent options whose gate is unset. Idempotent.
pub fn clean_article_options(
    mut options: OptionsMap,
    rules: &[DependentOptionRule],
) -> OptionsMap {
    for rule in rules {
        let gated = options.get(rule.gate).is_none_or(is_falsy);
        if gated {
            for key in rule.dependents {
                options.remove(*key);
            }
        }
    }
    options
}

/// Fill in defaults for keys the caller did not supply. Caller values win,
/// even empty ones.
pub fn merge_defaults(mut options: OptionsMap, defaults: &[(&str, &str)]) -> OptionsMap {
    for (key, value) in defaults {
        options
            .entry((*key).to_string())
            .or_insert_with(|| Value::String((*value).to_string()));
    }
    options
}

/// Reduce list options to the recognized key set: unset values are replaced
/// with their default and unknown keys are dropped.
pub fn sanitize_list_options(options: &OptionsMap, defaults: &[(&str, &str)]) -> OptionsMap {
    let mut sanitized = OptionsMap::new();
    for (key, fallback) in defaults {
        let value = match options.get(*key) {
            Some(value) if !is_falsy(value) => value.clone(),
            _ => Value::String((*fallback).to_string()),
        };
        sanitized.insert((*key).to_string(), value);
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(pairs: &[(&str, Value)]) -> OptionsMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn falsiness_matches_legacy_rules() {
        for value in [json!(null), json!(false), json!(0), json!(""), json!("0"), json!([])] {
            assert!(is_falsy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(1), json!("x"), json!(["a"]), json!(-1)] {
            assert!(!is_falsy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn streamer_options_stripped_when_gate_unset() {
        let options = map(&[
            ("streamer", json!("")),
            ("streamer_type", json!("extra")),
            ("streamer_color", json!("ff0000")),
            ("format", json!("wide")),
        ]);

        let cleaned = clean_article_options(options, ARTICLE_OPTION_RULES);
        assert!(!cleaned.contains_key("streamer_type"));
        assert!(!cleaned.contains_key("streamer_color"));
        assert_eq!(cleaned.get("format"), Some(&json!("wide")));
    }

    #[test]
    fn sticky_options_kept_when_gate_set() {
        let options = map(&[
            ("sticky", json!(true)),
            ("sticky_pos", json!("top")),
            ("sticky_interval", json!("*")),
        ]);

        let cleaned = clean_article_options(options, ARTICLE_OPTION_RULES);
        assert_eq!(cleaned.get("sticky_pos"), Some(&json!("top")));
        assert_eq!(cleaned.get("sticky_interval"), Some(&json!("*")));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let options = map(&[
            ("streamer", json!(0)),
            ("streamer_content", json!("BREAKING")),
            ("sticky", json!(true)),
            ("sticky_pos", json!("top")),
        ]);

        let once = clean_article_options(options, ARTICLE_OPTION_RULES);
        let twice = clean_article_options(once.clone(), ARTICLE_OPTION_RULES);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_defaults_keeps_caller_values() {
        let merged = merge_defaults(
            map(&[("before_title", json!("<h3>"))]),
            LIST_CREATE_DEFAULTS,
        );
        assert_eq!(merged.get("before_title"), Some(&json!("<h3>")));
        assert_eq!(merged.get("previewtemplate"), Some(&json!("article")));
        assert_eq!(merged.get("pagestopurge"), Some(&json!("")));
    }

    #[test]
    fn sanitize_drops_unknown_keys_and_fills_defaults() {
        let options = map(&[
            ("previewtemplate", json!("wide")),
            ("before_title", json!("")),
            ("rogue", json!("value")),
        ]);

        let sanitized = sanitize_list_options(&options, LIST_SANITIZE_DEFAULTS);
        assert_eq!(sanitized.get("previewtemplate"), Some(&json!("wide")));
        assert_eq!(sanitized.get("before_title"), Some(&json!("<h2>")));
        assert_eq!(sanitized.get("previewpage"), Some(&json!("/")));
        assert!(!sanitized.contains_key("rogue"));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let sanitized = sanitize_list_options(&OptionsMap::new(), LIST_SANITIZE_DEFAULTS);
        assert_eq!(
            sanitize_list_options(&sanitized, LIST_SANITIZE_DEFAULTS),
            sanitized
        );
    }
}
