//! Category tree
//!
//! Each parent category is its own record under `category:<name>`, holding
//! its sub-categories. Records are created or extended when bookmarks are
//! saved with a category and are never deleted.
//!
//! The per-domain view is derived from the live bookmark records instead of
//! these records, so the two can disagree once a bookmark's category
//! changes.

use chrono::Utc;
use tracing::debug;

use crate::bookmarks::BookmarkStore;
use crate::error::{Error, Result};
use crate::models::{Category, SubCategory};
use crate::records;
use crate::storage::keys::{category_key, CATEGORY_PREFIX};
use crate::storage::KvStore;

/// Persisted parent → sub-category registry
pub struct CategoryTree<'a> {
    kv: &'a dyn KvStore,
}

impl<'a> CategoryTree<'a> {
    pub fn new(kv: &'a dyn KvStore) -> Self {
        Self { kv }
    }

    /// Make sure `parent` exists, with `sub` beneath it if given
    ///
    /// Writes only when the parent record is new or gains a sub-category.
    pub fn ensure(&self, parent: &str, sub: Option<&str>) -> Result<Category> {
        if parent.is_empty() {
            return Err(Error::validation("parentCategory is required"));
        }

        let key = category_key(parent);
        let existing: Option<Category> = records::read(self.kv, &key)?;
        let mut changed = existing.is_none();
        let mut category = existing.unwrap_or_else(|| Category::new(parent));

        if let Some(sub) = sub.filter(|s| !s.is_empty()) {
            if !category.has_subcategory(sub) {
                category.subcategories.push(SubCategory {
                    name: sub.to_string(),
                    created_at: Some(Utc::now()),
                });
                changed = true;
            }
        }

        if changed {
            records::write(self.kv, &key, &category)?;
            debug!(parent, ?sub, "Extended category tree");
        }

        Ok(category)
    }

    /// Every persisted parent category, in key order
    pub fn list_all(&self) -> Result<Vec<Category>> {
        let mut categories = Vec::new();
        for key in self.kv.list(CATEGORY_PREFIX)? {
            if let Some(category) = records::read(self.kv, &key)? {
                categories.push(category);
            }
        }
        Ok(categories)
    }

    /// Number of parent categories (sub-categories are not counted)
    pub fn count(&self) -> Result<usize> {
        Ok(self.kv.list(CATEGORY_PREFIX)?.len())
    }

    /// Categories used by `domain`'s bookmarks right now
    ///
    /// Parents and sub-categories appear in first-seen order, without
    /// timestamps.
    pub fn list_for_domain(&self, domain: &str) -> Result<Vec<Category>> {
        let bookmarks = BookmarkStore::new(self.kv).list(domain)?;
        let mut categories: Vec<Category> = Vec::new();

        for (parent, sub) in bookmarks.iter().filter_map(|b| b.category_pair()) {
            let index = match categories.iter().position(|c| c.name == parent) {
                Some(index) => index,
                None => {
                    categories.push(Category {
                        name: parent.to_string(),
                        subcategories: Vec::new(),
                        created_at: None,
                    });
                    categories.len() - 1
                }
            };

            let category = &mut categories[index];
            if let Some(sub) = sub {
                if !category.has_subcategory(sub) {
                    category.subcategories.push(SubCategory {
                        name: sub.to_string(),
                        created_at: None,
                    });
                }
            }
        }

        Ok(categories)
    }
}
