//! Global tag index
//!
//! A single JSON array under `tags`, in order of first appearance. The
//! index only grows: deleting bookmarks never removes tags from it.

use std::collections::HashMap;

use tracing::debug;

use crate::bookmarks::BookmarkStore;
use crate::error::Result;
use crate::models::TagCount;
use crate::records;
use crate::storage::keys::TAGS_KEY;
use crate::storage::KvStore;

/// The registry of every tag ever saved
pub struct TagIndex<'a> {
    kv: &'a dyn KvStore,
}

impl<'a> TagIndex<'a> {
    pub fn new(kv: &'a dyn KvStore) -> Self {
        Self { kv }
    }

    /// Add every non-empty tag not yet known
    ///
    /// Writes only when something was added. Returns how many tags were new.
    pub fn ensure<S: AsRef<str>>(&self, tags: &[S]) -> Result<usize> {
        let mut known = self.all()?;
        let before = known.len();

        for tag in tags.iter().map(AsRef::as_ref) {
            if !tag.is_empty() && !known.iter().any(|k| k == tag) {
                known.push(tag.to_string());
            }
        }

        let added = known.len() - before;
        if added > 0 {
            records::write(self.kv, TAGS_KEY, &known)?;
            debug!(added, total = known.len(), "Extended tag index");
        }

        Ok(added)
    }

    /// Every known tag, in order of first appearance
    pub fn all(&self) -> Result<Vec<String>> {
        Ok(records::read(self.kv, TAGS_KEY)?.unwrap_or_default())
    }

    /// Number of known tags
    pub fn count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    /// Every known tag with a usage count
    ///
    /// The index does not track global usage, so each count is 1.
    pub fn list_all(&self) -> Result<Vec<TagCount>> {
        Ok(self
            .all()?
            .into_iter()
            .map(|tag| TagCount { tag, count: 1 })
            .collect())
    }

    /// Tags used in `domain`'s partition, most used first
    ///
    /// Blank tags are dropped. Ties keep first-seen order.
    pub fn list_for_domain(&self, domain: &str) -> Result<Vec<TagCount>> {
        let bookmarks = BookmarkStore::new(self.kv).list(domain)?;
        let tags = bookmarks
            .iter()
            .flat_map(|b| b.tags.iter().map(String::as_str))
            .filter(|tag| !tag.trim().is_empty());

        Ok(rank(tally(tags)))
    }
}

/// Count occurrences, keeping first-seen order
pub(crate) fn tally<'t>(tags: impl IntoIterator<Item = &'t str>) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tag in tags {
        match positions.get(tag) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(tag, counts.len());
                counts.push(TagCount {
                    tag: tag.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Sort by count descending; the sort is stable so ties keep their order
pub(crate) fn rank(mut counts: Vec<TagCount>) -> Vec<TagCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
