//! Two-level article trees and the pure core of the flat-row codec.
//!
//! Articles persist as flat rows where `parent` is the array offset of the
//! owning top-level article within its version, not a row id. Flattening and
//! reassembly are pure functions so the offset protocol can be exercised
//! without a store: `flatten` runs two passes over the already-truncated
//! top-level slice, and `assemble` relies on `(parent, sort)` ordering to
//! place every top-level article before any of its children arrive.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ArticleRecord, NewArticleRow, OptionsMap};
use crate::domain::options::{ARTICLE_OPTION_RULES, clean_article_options};

/// `parent` value marking a top-level row.
pub const TOP_LEVEL: i64 = -1;

/// `post_id` sentinel for articles without an external content reference.
pub const NO_POST: i64 = -1;

const DEFAULT_TITLE_FONTSIZE: i64 = 24;

/// One article in a version's tree. Children are only honored one level
/// deep; anything nested below that is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub post_id: i64,
    pub title: String,
    pub text: String,
    pub url: String,
    pub image: String,
    pub image_options: OptionsMap,
    pub options: OptionsMap,
    pub title_fontsize: i64,
    pub created: i64,
    pub publish_date: i64,
    pub children: Vec<Article>,
}

impl Default for Article {
    fn default() -> Self {
        Self {
            id: 0,
            post_id: NO_POST,
            title: String::new(),
            text: String::new(),
            url: String::new(),
            image: String::new(),
            image_options: OptionsMap::new(),
            options: OptionsMap::new(),
            title_fontsize: DEFAULT_TITLE_FONTSIZE,
            created: 0,
            publish_date: 0,
            children: Vec::new(),
        }
    }
}

impl Article {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn from_record(record: ArticleRecord) -> Self {
        Self {
            id: record.id,
            post_id: record.post_id,
            title: record.title,
            text: record.text,
            url: record.url,
            image: record.image,
            image_options: record.image_options,
            options: record.options,
            title_fontsize: record.title_fontsize,
            created: record.created,
            publish_date: record.publish_date,
            children: Vec::new(),
        }
    }
}

/// Number of top-level articles persisted for a list with the given max
/// length. The store stops once `maxlength - 1` articles are written; the
/// off-by-one is inherited behavior and kept.
pub fn top_level_cap(maxlength: i64) -> usize {
    if maxlength <= 1 {
        0
    } else {
        (maxlength - 1) as usize
    }
}

/// Flatten a two-level tree into rows for one version.
///
/// The top-level sequence is truncated to the cap first; offsets are assigned
/// over the surviving slice, so a child always references a parent that was
/// persisted. Children of a truncated parent are dropped with it.
pub fn flatten(articles: &[Article], maxlength: i64, now: i64) -> Vec<NewArticleRow> {
    let cap = top_level_cap(maxlength).min(articles.len());
    let tops = &articles[..cap];

    let mut rows = Vec::with_capacity(tops.len());
    for (offset, article) in tops.iter().enumerate() {
        rows.push(row_for(article, offset as i64, TOP_LEVEL, now));
    }
    for (offset, article) in tops.iter().enumerate() {
        for (sort, child) in article.children.iter().enumerate() {
            rows.push(row_for(child, sort as i64, offset as i64, now));
        }
    }
    rows
}

fn row_for(article: &Article, sort: i64, parent: i64, now: i64) -> NewArticleRow {
    NewArticleRow {
        created: if article.created == 0 { now } else { article.created },
        publish_date: if article.publish_date == 0 {
            now
        } else {
            article.publish_date
        },
        post_id: article.post_id,
        title: article.title.clone(),
        text: article.text.clone(),
        sort,
        title_fontsize: article.title_fontsize,
        url: article.url.clone(),
        options: clean_article_options(article.options.clone(), ARTICLE_OPTION_RULES),
        image: article.image.clone(),
        image_options: article.image_options.clone(),
        parent,
    }
}

/// Reassemble a two-level tree from rows ordered by `(parent, sort)`.
///
/// Top-level rows (`parent = -1`) sort first, so each child row can attach to
/// the top-level article already placed at its parent offset. Rows pointing
/// at an offset that was never placed are skipped.
///
/// With `exclude_future`, top-level articles whose `publish_date` is nonzero
/// and after `now` are removed and the remainder reindexed contiguously;
/// children are never filtered.
pub fn assemble(rows: Vec<ArticleRecord>, exclude_future: bool, now: i64) -> Vec<Article> {
    let mut tops: Vec<Article> = Vec::new();
    for row in rows {
        let parent = row.parent;
        let article = Article::from_record(row);
        if parent == TOP_LEVEL {
            tops.push(article);
        } else if let Some(owner) = usize::try_from(parent)
            .ok()
            .and_then(|offset| tops.get_mut(offset))
        {
            owner.children.push(article);
        }
    }

    if exclude_future {
        tops.retain(|article| article.publish_date == 0 || article.publish_date <= now);
    }

    tops
}
