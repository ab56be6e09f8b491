//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};

use crate::domain::types::VersionStatus;

/// String-keyed option mapping persisted as a JSON text blob.
///
/// Values are scalars or arrays; an empty stored blob decodes to an empty
/// mapping for legacy compatibility.
pub type OptionsMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: i64,
    pub created: i64,
    pub title: String,
    pub slug: String,
    pub maxlength: i64,
    pub options: OptionsMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: i64,
    pub created: i64,
    pub status: VersionStatus,
    pub user_id: i64,
}

/// One flat article row as stored for a version.
///
/// `parent` is -1 for top-level rows, otherwise the array offset of the
/// owning top-level article within the version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub created: i64,
    pub publish_date: i64,
    pub post_id: i64,
    pub title: String,
    pub text: String,
    pub sort: i64,
    pub title_fontsize: i64,
    pub url: String,
    pub options: OptionsMap,
    pub image: String,
    pub image_options: OptionsMap,
    pub parent: i64,
}

/// Row shape handed to the articles repository when a version is encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticleRow {
    pub created: i64,
    pub publish_date: i64,
    pub post_id: i64,
    pub title: String,
    pub text: String,
    pub sort: i64,
    pub title_fontsize: i64,
    pub url: String,
    pub options: OptionsMap,
    pub image: String,
    pub image_options: OptionsMap,
    pub parent: i64,
}

/// Slug index entry; the full index is cached and scanned for slug lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlugEntry {
    pub id: i64,
    pub title: String,
    pub slug: String,
}
