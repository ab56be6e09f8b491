//! Text normalization applied when list metadata is saved.
//!
//! Titles and slugs arrive from upstream form handling that may have added
//! backslash escaping; the save path strips those artifacts and reduces slugs
//! to their canonical lookup form. Reads never normalize.

use serde_json::Value;
use slug::slugify;

use crate::domain::entities::OptionsMap;

/// Remove backslash escaping artifacts: `\'` becomes `'`, `\\` becomes `\`.
pub fn unescape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                output.push(next);
            }
        } else {
            output.push(ch);
        }
    }
    output
}

/// Canonical slug form used for list lookup keys.
pub fn normalize_slug(input: &str) -> String {
    slugify(unescape(input))
}

/// Unescape every string value in an option mapping, including strings
/// nested inside arrays.
pub fn unescape_values(options: &mut OptionsMap) {
    for value in options.values_mut() {
        unescape_value(value);
    }
}

fn unescape_value(value: &mut Value) {
    match value {
        Value::String(s) => *s = unescape(s),
        Value::Array(items) => {
            for item in items {
                unescape_value(item);
            }
        }
        Value::Object(map) => {
            for nested in map.values_mut() {
                unescape_value(nested);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unescape_strips_single_backslashes() {
        assert_eq!(unescape(r"it\'s"), "it's");
        assert_eq!(unescape(r"a\\b"), r"a\b");
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape(r"trailing\"), "trailing");
    }

    #[test]
    fn slug_normalization_lowercases_and_hyphenates() {
        assert_eq!(normalize_slug("Front Page!"), "front-page");
        assert_eq!(normalize_slug(r"It\'s News"), "it-s-news");
        assert_eq!(normalize_slug("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn unescape_values_recurses_into_arrays() {
        let mut options: OptionsMap = [
            ("title".to_string(), json!(r"it\'s")),
            ("tags".to_string(), json!([r"a\'b", "c"])),
            ("depth".to_string(), json!(3)),
        ]
        .into_iter()
        .collect();

        unescape_values(&mut options);
        assert_eq!(options.get("title"), Some(&json!("it's")));
        assert_eq!(options.get("tags"), Some(&json!(["a'b", "c"])));
        assert_eq!(options.get("depth"), Some(&json!(3)));
    }
}
