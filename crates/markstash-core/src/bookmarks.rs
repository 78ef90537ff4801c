//! Bookmark store
//!
//! Owns the per-domain partitions. A partition is one JSON array under
//! `domain:<host>`; every write reads the whole array, changes it and
//! puts it back. There is no version check, so two concurrent writers to
//! the same domain race and the last put wins.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Bookmark, BookmarkFields, BookmarkKey, BookmarkPatch, SaveAction, Saved};
use crate::records;
use crate::storage::keys::{domain_from_key, domain_key, DOMAIN_PREFIX};
use crate::storage::KvStore;

/// Domain-partitioned bookmark records
pub struct BookmarkStore<'a> {
    kv: &'a dyn KvStore,
}

impl<'a> BookmarkStore<'a> {
    pub fn new(kv: &'a dyn KvStore) -> Self {
        Self { kv }
    }

    /// Insert or refresh the bookmark at `url`
    ///
    /// An existing record with the same path keeps its `createdAt`; every
    /// other field is replaced.
    pub fn save(&self, url: &str, fields: BookmarkFields) -> Result<Saved> {
        let key = BookmarkKey::from_url(url)?;
        let mut partition = self.partition(&key.domain)?;

        let action = match partition.iter_mut().find(|b| b.path == key.path) {
            Some(existing) => {
                existing.replace_fields(fields);
                SaveAction::Updated
            }
            None => {
                partition.push(Bookmark::new(key.path.clone(), fields));
                SaveAction::Inserted
            }
        };

        self.write_partition(&key.domain, &partition)?;
        info!(domain = %key.domain, path = %key.path, ?action, "Saved bookmark");

        Ok(Saved { key, action })
    }

    /// Merge `patch` over the record at `key`
    pub fn update(&self, key: &BookmarkKey, patch: BookmarkPatch) -> Result<Bookmark> {
        let mut partition = self.partition(&key.domain)?;
        let bookmark = partition
            .iter_mut()
            .find(|b| b.path == key.path)
            .ok_or_else(|| Error::not_found(format!("Bookmark not found: {}", key)))?;

        bookmark.apply_patch(patch);
        let updated = bookmark.clone();

        self.write_partition(&key.domain, &partition)?;
        info!(domain = %key.domain, path = %key.path, "Updated bookmark");

        Ok(updated)
    }

    /// Records in `domain`'s partition; unknown domains are empty
    pub fn list(&self, domain: &str) -> Result<Vec<Bookmark>> {
        self.partition(domain)
    }

    /// Every partition, keyed by domain in key order
    pub fn list_all(&self) -> Result<BTreeMap<String, Vec<Bookmark>>> {
        Ok(self.scan()?.into_iter().collect())
    }

    /// Load all partitions, in key order
    ///
    /// Keys that vanish between the listing and the read are skipped.
    pub fn scan(&self) -> Result<Vec<(String, Vec<Bookmark>)>> {
        let keys = self.kv.list(DOMAIN_PREFIX)?;
        let mut partitions = Vec::with_capacity(keys.len());

        for key in keys {
            let Some(domain) = domain_from_key(&key) else {
                continue;
            };
            if let Some(records) = records::read::<Vec<Bookmark>>(self.kv, &key)? {
                partitions.push((domain.to_string(), records));
            }
        }

        debug!(partitions = partitions.len(), "Scanned domain partitions");
        Ok(partitions)
    }

    /// Remove the record at `key`, dropping the partition if it empties
    pub fn delete(&self, key: &BookmarkKey) -> Result<()> {
        let storage_key = domain_key(&key.domain);
        let mut partition: Vec<Bookmark> = records::read(self.kv, &storage_key)?
            .ok_or_else(|| Error::not_found(format!("Bookmark not found: {}", key)))?;

        let index = partition
            .iter()
            .position(|b| b.path == key.path)
            .ok_or_else(|| Error::not_found(format!("Bookmark not found: {}", key)))?;
        partition.remove(index);

        if partition.is_empty() {
            self.kv.delete(&storage_key)?;
            info!(domain = %key.domain, "Removed empty domain partition");
        } else {
            records::write(self.kv, &storage_key, &partition)?;
        }

        info!(domain = %key.domain, path = %key.path, "Deleted bookmark");
        Ok(())
    }

    fn partition(&self, domain: &str) -> Result<Vec<Bookmark>> {
        Ok(records::read(self.kv, &domain_key(domain))?.unwrap_or_default())
    }

    fn write_partition(&self, domain: &str, partition: &[Bookmark]) -> Result<()> {
        records::write(self.kv, &domain_key(domain), partition)
    }
}
