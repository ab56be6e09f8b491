//! The list aggregate assembled by the facade read path.

use serde::{Deserialize, Serialize};

use crate::domain::articles::Article;
use crate::domain::entities::{ListRecord, OptionsMap, VersionRecord};
use crate::domain::options::{LIST_SANITIZE_DEFAULTS, sanitize_list_options};
use crate::domain::text::{normalize_slug, unescape, unescape_values};
use crate::domain::types::VersionStatus;

/// Fallback cap on articles per version when the stored value is unusable.
pub const DEFAULT_MAXLENGTH: i64 = 50;

/// A list together with whatever version content the read path resolved.
///
/// A lookup that finds nothing returns a marker value with `exists` unset
/// rather than an error; callers check the flag. The version fields stay at
/// their empty defaults when no matching version exists, which signals "never
/// published" (or previewed) without erroring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct List {
    pub exists: bool,
    pub id: i64,
    pub created: i64,
    pub title: String,
    pub slug: String,
    pub maxlength: i64,
    pub options: OptionsMap,
    /// Set by the import pipeline for lists sourced from external feeds;
    /// imported lists are read-only and refuse new versions.
    pub imported: bool,
    pub status: Option<VersionStatus>,
    pub version: Option<VersionRecord>,
    /// Ids of the most recent published versions, newest first.
    pub versions: Vec<i64>,
    pub articles: Vec<Article>,
}

impl List {
    /// Marker for a list that does not exist.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn from_record(record: ListRecord) -> Self {
        Self {
            exists: true,
            id: record.id,
            created: record.created,
            title: record.title,
            slug: record.slug,
            maxlength: record.maxlength,
            options: record.options,
            ..Self::default()
        }
    }

    /// Metadata view of this list as persisted.
    pub fn record(&self) -> ListRecord {
        ListRecord {
            id: self.id,
            created: self.created,
            title: self.title.clone(),
            slug: self.slug.clone(),
            maxlength: self.maxlength,
            options: self.options.clone(),
        }
    }

    /// In-place metadata sanitation applied before a new version is written.
    ///
    /// Unescapes the title and option values, normalizes the slug, reduces
    /// options to the recognized set, and restores a usable max length. Only
    /// the in-memory aggregate changes; persisting is the caller's call.
    pub fn sanitize(&mut self) {
        self.title = unescape(&self.title);
        self.slug = normalize_slug(&self.slug);
        let mut options = sanitize_list_options(&self.options, LIST_SANITIZE_DEFAULTS);
        unescape_values(&mut options);
        self.options = options;
        if self.maxlength <= 0 {
            self.maxlength = DEFAULT_MAXLENGTH;
        }
    }
}

/// Cached composite served for the default (latest published) read path:
/// resolved version metadata, recent published history, and the decoded
/// article tree with future posts excluded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PublishedBundle {
    pub version: Option<VersionRecord>,
    pub versions: Vec<i64>,
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_list_is_inert() {
        let list = List::missing();
        assert!(!list.exists);
        assert!(list.version.is_none());
        assert!(list.articles.is_empty());
    }

    #[test]
    fn sanitize_normalizes_metadata() {
        let mut list = List {
            exists: true,
            id: 3,
            title: r"Editor\'s Picks".into(),
            slug: "Editor Picks!".into(),
            maxlength: 0,
            ..List::default()
        };
        list.options.insert("rogue".into(), json!("x"));

        list.sanitize();
        assert_eq!(list.title, "Editor's Picks");
        assert_eq!(list.slug, "editor-picks");
        assert_eq!(list.maxlength, DEFAULT_MAXLENGTH);
        assert!(!list.options.contains_key("rogue"));
        assert_eq!(list.options.get("previewpage"), Some(&json!("/")));
    }

    #[test]
    fn sanitize_keeps_positive_maxlength() {
        let mut list = List {
            exists: true,
            maxlength: 7,
            slug: "ok".into(),
            ..List::default()
        };
        list.sanitize();
        assert_eq!(list.maxlength, 7);
    }
}
