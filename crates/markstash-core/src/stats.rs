//! Aggregate statistics
//!
//! Recomputed on every call from a full scan of the domain partitions plus
//! the tag index and the category keys. Nothing is cached or persisted.
//! A partition that fails to parse aborts the whole computation.

use tracing::debug;

use crate::bookmarks::BookmarkStore;
use crate::categories::CategoryTree;
use crate::error::Result;
use crate::models::{DomainBookmark, DomainCount, Stats};
use crate::storage::KvStore;
use crate::tags::{rank, tally, TagIndex};

/// Length of every top-N list in the snapshot
pub const TOP_N: usize = 10;

/// Compute a fresh [`Stats`] snapshot
pub fn compute(kv: &dyn KvStore) -> Result<Stats> {
    let partitions = BookmarkStore::new(kv).scan()?;

    let mut stats = Stats::default();
    let mut domain_counts = Vec::with_capacity(partitions.len());
    let mut recent = Vec::new();

    for (domain, bookmarks) in &partitions {
        stats.bookmarks += bookmarks.len();
        domain_counts.push(DomainCount {
            domain: domain.clone(),
            count: bookmarks.len(),
            last_updated: bookmarks
                .iter()
                .map(|b| b.updated_at.timestamp_millis())
                .max()
                .unwrap_or_default(),
        });
        recent.extend(bookmarks.iter().map(|bookmark| DomainBookmark {
            domain: domain.clone(),
            bookmark: bookmark.clone(),
        }));
    }

    stats.domains = domain_counts.len();
    stats.tags = TagIndex::new(kv).count()?;
    stats.categories = CategoryTree::new(kv).count()?;

    let tags = partitions
        .iter()
        .flat_map(|(_, bookmarks)| bookmarks.iter())
        .flat_map(|b| b.tags.iter().map(String::as_str));
    stats.top_tags = rank(tally(tags));
    stats.top_tags.truncate(TOP_N);

    // Partitions arrive in key order; the stable sort keeps it for ties.
    domain_counts.sort_by(|a, b| b.count.cmp(&a.count));
    domain_counts.truncate(TOP_N);
    stats.top_domains = domain_counts;

    recent.sort_by(|a, b| b.bookmark.updated_at.cmp(&a.bookmark.updated_at));
    recent.truncate(TOP_N);
    stats.recent_bookmarks = recent;

    debug!(
        domains = stats.domains,
        bookmarks = stats.bookmarks,
        "Computed stats"
    );
    Ok(stats)
}
