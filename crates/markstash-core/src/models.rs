//! Data models for markstash
//!
//! Records are stored as camelCase JSON so that the persisted layout and
//! the HTTP payloads share one shape.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::storage::keys::DOMAIN_PREFIX;

/// A saved bookmark inside a domain partition
///
/// The full URL is not stored; the partition's domain plus `path`
/// reconstruct it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(default)]
    pub title: String,
    /// URL path plus query string, unique within the partition
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a new record at `path` with both timestamps set to now
    pub fn new(path: impl Into<String>, fields: BookmarkFields) -> Self {
        let now = Utc::now();
        Self {
            title: fields.title,
            path: path.into(),
            image: fields.image,
            tags: fields.tags,
            description: fields.description,
            parent_category: fields.parent_category,
            sub_category: fields.sub_category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field, keeping `path` and `created_at`
    pub fn replace_fields(&mut self, fields: BookmarkFields) {
        self.title = fields.title;
        self.image = fields.image;
        self.tags = fields.tags;
        self.description = fields.description;
        self.parent_category = fields.parent_category;
        self.sub_category = fields.sub_category;
        self.updated_at = Utc::now();
    }

    /// Overwrite only the fields present in `patch`
    pub fn apply_patch(&mut self, patch: BookmarkPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(image) = patch.image {
            self.image = Some(image);
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(parent) = patch.parent_category {
            self.parent_category = Some(parent);
        }
        if let Some(sub) = patch.sub_category {
            self.sub_category = Some(sub);
        }
        self.updated_at = Utc::now();
    }

    /// Parent and sub-category, with empty strings treated as absent
    pub fn category_pair(&self) -> Option<(&str, Option<&str>)> {
        let parent = non_empty(self.parent_category.as_deref())?;
        Some((parent, non_empty(self.sub_category.as_deref())))
    }

    /// Lowercased text the search engine matches queries against
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.tags.len() + 4);
        parts.push(&self.title);
        parts.extend(self.description.as_deref());
        parts.extend(self.tags.iter().map(String::as_str));
        parts.extend(self.parent_category.as_deref());
        parts.extend(self.sub_category.as_deref());

        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// The caller-supplied part of a bookmark, as sent to save
///
/// A `null` title reads as empty. `tags` that is not an array reads as no
/// tags, and non-string entries are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkFields {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "string_array_or_empty")]
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub parent_category: Option<String>,
    pub sub_category: Option<String>,
    pub image: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub parent_category: Option<String>,
    pub sub_category: Option<String>,
    pub image: Option<String>,
}

impl BookmarkPatch {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Canonical address of a bookmark: its domain partition and path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookmarkKey {
    pub domain: String,
    pub path: String,
}

impl BookmarkKey {
    pub fn new(domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            path: path.into(),
        }
    }

    /// Split a full URL into host and path-plus-query
    pub fn from_url(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::validation("url is required"));
        }

        let url = Url::parse(raw)
            .map_err(|e| Error::validation(format!("Invalid url '{}': {}", raw, e)))?;
        let domain = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::validation(format!("Url '{}' has no host", raw)))?;

        let path = match url.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
            _ => url.path().to_string(),
        };

        Ok(Self::new(domain, path))
    }

    /// Translate an opaque key into `(domain, path)`
    ///
    /// Accepted forms: a full URL (`https://a.com/p`), a partition key
    /// followed by the path (`domain:a.com/p`), or a bare `a.com/p`. A key
    /// without a path addresses `/`.
    pub fn parse(key: &str) -> Result<Self> {
        let key = key.trim();
        if key.contains("://") {
            return Self::from_url(key);
        }

        let rest = key.strip_prefix(DOMAIN_PREFIX).unwrap_or(key);
        let (domain, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        if domain.is_empty() {
            return Err(Error::validation(format!(
                "Bookmark key '{}' has no domain",
                key
            )));
        }

        Ok(Self::new(domain, path))
    }
}

impl fmt::Display for BookmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.domain, self.path)
    }
}

/// Whether save created a record or refreshed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Inserted,
    Updated,
}

/// Result of a save
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    pub key: BookmarkKey,
    pub action: SaveAction,
}

/// A parent category and its sub-categories
///
/// Persisted records always carry timestamps; the per-domain view derived
/// from bookmarks has none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Fresh persisted record with no sub-categories
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcategories: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn has_subcategory(&self, name: &str) -> bool {
        self.subcategories.iter().any(|sub| sub.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A tag with how often it is used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// A bookmark annotated with the domain it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainBookmark {
    pub domain: String,
    #[serde(flatten)]
    pub bookmark: Bookmark,
}

/// Bookmark count for one domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
    /// Newest `updatedAt` in the partition, epoch milliseconds
    pub last_updated: i64,
}

/// Aggregate snapshot computed per request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub domains: usize,
    pub bookmarks: usize,
    pub tags: usize,
    pub categories: usize,
    pub top_domains: Vec<DomainCount>,
    pub top_tags: Vec<TagCount>,
    pub recent_bookmarks: Vec<DomainBookmark>,
}

/// Search filters; every supplied filter must match
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub domain: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn text(&self) -> Option<&str> {
        non_empty(self.q.as_deref())
    }

    pub fn domain(&self) -> Option<&str> {
        non_empty(self.domain.as_deref())
    }

    pub fn tag(&self) -> Option<&str> {
        non_empty(self.tag.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none()
            && self.domain().is_none()
            && self.tag().is_none()
            && self.category().is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub total: usize,
    pub results: Vec<DomainBookmark>,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_array_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}
