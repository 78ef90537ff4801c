//! Bookmark search
//!
//! Filters are combined with AND. The text query is a case-insensitive
//! substring match; there is no ranking beyond newest-first.

use tracing::debug;

use crate::bookmarks::BookmarkStore;
use crate::error::{Error, Result};
use crate::models::{Bookmark, DomainBookmark, SearchQuery, SearchResults};
use crate::storage::KvStore;

/// Run `query` against every partition (or only `query.domain`)
pub fn search(kv: &dyn KvStore, query: &SearchQuery) -> Result<SearchResults> {
    if query.is_empty() {
        return Err(Error::validation(
            "Provide at least one of q, domain, tag or category",
        ));
    }

    let store = BookmarkStore::new(kv);
    let partitions = match query.domain() {
        Some(domain) => vec![(domain.to_string(), store.list(domain)?)],
        None => store.scan()?,
    };

    let needle = query.text().map(str::to_lowercase);
    let mut results: Vec<DomainBookmark> = partitions
        .into_iter()
        .flat_map(|(domain, bookmarks)| {
            bookmarks.into_iter().map(move |bookmark| DomainBookmark {
                domain: domain.clone(),
                bookmark,
            })
        })
        .filter(|hit| is_match(&hit.bookmark, query, needle.as_deref()))
        .collect();

    results.sort_by(|a, b| b.bookmark.updated_at.cmp(&a.bookmark.updated_at));

    debug!(?query, total = results.len(), "Search finished");
    Ok(SearchResults {
        total: results.len(),
        results,
    })
}

fn is_match(bookmark: &Bookmark, query: &SearchQuery, needle: Option<&str>) -> bool {
    if let Some(tag) = query.tag() {
        if !bookmark.tags.iter().any(|t| t == tag) {
            return false;
        }
    }

    if let Some(category) = query.category() {
        if bookmark.parent_category.as_deref() != Some(category) {
            return false;
        }
    }

    match needle {
        Some(needle) => bookmark.searchable_text().contains(needle),
        None => true,
    }
}
