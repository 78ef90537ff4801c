//! Unified engine interface
//!
//! The `Store` runs one engine operation per call against the backing
//! store. It holds no data of its own, only a handle to the backend, so it
//! is cheap to clone into request handlers.
//!
//! ## Writes and the index outbox
//!
//! Saving or updating a bookmark touches three independent keys: the
//! domain partition, the tag list and a category record. The partition
//! write happens first. Only once it has succeeded are the index updates
//! queued and applied, tags before categories. An index update that fails
//! is logged and dropped; the partition write is never rolled back.
//!
//! ## Concurrency
//!
//! Every write is read-modify-write on whole keys without a version check.
//! Two concurrent saves to the same domain can lose one update (last put
//! wins). The same holds for the tag list and category records.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::bookmarks::BookmarkStore;
use crate::categories::CategoryTree;
use crate::config::{Backend, Config};
use crate::error::Result;
use crate::models::{
    non_empty, Bookmark, BookmarkFields, BookmarkKey, BookmarkPatch, Category, Saved,
    SearchQuery, SearchResults, Stats, TagCount,
};
use crate::storage::{KvStore, MemoryKv, SqliteKv};
use crate::tags::TagIndex;
use crate::{search, stats};

/// Derived-index update queued behind a bookmark write
#[derive(Debug, Clone, PartialEq)]
enum IndexEffect {
    Tags(Vec<String>),
    Category { parent: String, sub: Option<String> },
}

impl IndexEffect {
    /// Effects implied by a bookmark's tags and category
    fn for_bookmark(tags: &[String], parent: Option<&str>, sub: Option<&str>) -> Vec<Self> {
        let mut effects = Vec::with_capacity(2);
        if !tags.is_empty() {
            effects.push(IndexEffect::Tags(tags.to_vec()));
        }
        if let Some(parent) = non_empty(parent) {
            effects.push(IndexEffect::Category {
                parent: parent.to_string(),
                sub: non_empty(sub).map(str::to_string),
            });
        }
        effects
    }
}

/// Entry point for every engine operation
#[derive(Clone)]
pub struct Store {
    kv: Arc<dyn KvStore>,
}

impl Store {
    /// Open the backend selected by `config`
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let kv: Arc<dyn KvStore> = match config.backend {
            Backend::Sqlite => {
                let path = config.database_path();
                let kv = SqliteKv::open(&path)
                    .with_context(|| format!("Failed to open backing store at {:?}", path))?;
                info!(path = %path.display(), "Opened SQLite backing store");
                Arc::new(kv)
            }
            Backend::Memory => {
                info!("Using in-memory backing store");
                Arc::new(MemoryKv::new())
            }
        };

        Ok(Self::new(kv))
    }

    /// Wrap an existing backend
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// A store over a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKv::new()))
    }

    /// The underlying backend
    pub fn backend(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }

    // ==================== Bookmark Operations ====================

    /// Save the bookmark at `url`, then grow the tag and category indexes
    pub fn save(&self, url: &str, fields: BookmarkFields) -> Result<Saved> {
        let effects = IndexEffect::for_bookmark(
            &fields.tags,
            fields.parent_category.as_deref(),
            fields.sub_category.as_deref(),
        );

        let saved = self.bookmarks().save(url, fields)?;
        self.apply_effects(effects);
        Ok(saved)
    }

    /// Merge `patch` into the bookmark at `key`, then grow the indexes
    pub fn update(&self, key: &BookmarkKey, patch: BookmarkPatch) -> Result<Bookmark> {
        let effects = IndexEffect::for_bookmark(
            patch.tags(),
            patch.parent_category.as_deref(),
            patch.sub_category.as_deref(),
        );

        let updated = self.bookmarks().update(key, patch)?;
        self.apply_effects(effects);
        Ok(updated)
    }

    /// Bookmarks saved under `domain`
    pub fn list(&self, domain: &str) -> Result<Vec<Bookmark>> {
        self.bookmarks().list(domain)
    }

    /// Every domain with its bookmarks
    pub fn list_all(&self) -> Result<BTreeMap<String, Vec<Bookmark>>> {
        self.bookmarks().list_all()
    }

    /// Delete one bookmark; the tag and category indexes are left alone
    pub fn delete(&self, key: &BookmarkKey) -> Result<()> {
        self.bookmarks().delete(key)
    }

    // ==================== Category Operations ====================

    /// Register a parent category and optional sub-category
    pub fn save_category(&self, parent: &str, sub: Option<&str>) -> Result<Category> {
        self.categories().ensure(parent, sub)
    }

    /// Every persisted category
    pub fn categories_list(&self) -> Result<Vec<Category>> {
        self.categories().list_all()
    }

    /// Categories derived from `domain`'s bookmarks
    pub fn domain_categories(&self, domain: &str) -> Result<Vec<Category>> {
        self.categories().list_for_domain(domain)
    }

    // ==================== Tag Operations ====================

    /// Every known tag (each counted once)
    pub fn tags(&self) -> Result<Vec<TagCount>> {
        self.tag_index().list_all()
    }

    /// Tags used by `domain`'s bookmarks, most used first
    pub fn domain_tags(&self, domain: &str) -> Result<Vec<TagCount>> {
        self.tag_index().list_for_domain(domain)
    }

    // ==================== Aggregates ====================

    /// Compute a statistics snapshot
    pub fn stats(&self) -> Result<Stats> {
        stats::compute(self.backend())
    }

    /// Search bookmarks
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        search::search(self.backend(), query)
    }

    // ==================== Internals ====================

    fn bookmarks(&self) -> BookmarkStore<'_> {
        BookmarkStore::new(self.backend())
    }

    fn tag_index(&self) -> TagIndex<'_> {
        TagIndex::new(self.backend())
    }

    fn categories(&self) -> CategoryTree<'_> {
        CategoryTree::new(self.backend())
    }

    /// Apply queued index updates in order, logging failures
    fn apply_effects(&self, effects: Vec<IndexEffect>) {
        for effect in effects {
            let outcome = match &effect {
                IndexEffect::Tags(tags) => self.tag_index().ensure(tags).map(|_| ()),
                IndexEffect::Category { parent, sub } => {
                    self.categories().ensure(parent, sub.as_deref()).map(|_| ())
                }
            };

            if let Err(err) = outcome {
                warn!(?effect, error = %err, "Index update failed; bookmark write kept");
            }
        }
    }
}
