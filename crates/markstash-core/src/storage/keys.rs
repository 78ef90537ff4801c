//! Key layout in the backing store
//!
//! - `domain:<host>` → JSON array of bookmark records
//! - `category:<name>` → JSON category record
//! - `tags` → JSON array of tag strings

/// Prefix for domain partitions
pub const DOMAIN_PREFIX: &str = "domain:";

/// Prefix for category records
pub const CATEGORY_PREFIX: &str = "category:";

/// Key of the global tag list
pub const TAGS_KEY: &str = "tags";

/// Key of the partition holding `domain`'s bookmarks
pub fn domain_key(domain: &str) -> String {
    format!("{}{}", DOMAIN_PREFIX, domain)
}

/// Key of the record for parent category `name`
pub fn category_key(name: &str) -> String {
    format!("{}{}", CATEGORY_PREFIX, name)
}

/// Recover the domain from a partition key
pub fn domain_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(DOMAIN_PREFIX)
}
