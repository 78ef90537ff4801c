//! markstash core library
//!
//! A bookmark storage and indexing engine layered over a plain key-value
//! store. Bookmarks are partitioned by domain; a global tag list and one
//! record per parent category are maintained on the side as the bookmarks
//! are written.
//!
//! # Architecture
//!
//! - **Backing store**: anything implementing [`KvStore`] (SQLite or memory)
//! - **Partitions**: `domain:<host>` holds every bookmark saved for a host
//! - **Indexes**: `tags` and `category:<name>` grow monotonically and are
//!   updated best-effort after the partition write
//!
//! Statistics and search are recomputed from a full scan on every call.
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::in_memory();
//!
//! store.save("https://example.com/post", BookmarkFields {
//!     title: "Example".into(),
//!     tags: vec!["rust".into()],
//!     ..Default::default()
//! })?;
//!
//! let bookmarks = store.list("example.com")?;
//! let stats = store.stats()?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified engine interface (main entry point)
//! - `bookmarks`: Domain partitions
//! - `tags`: Global tag list and per-domain tag counts
//! - `categories`: Category tree and per-domain category view
//! - `stats`: Aggregate snapshot
//! - `search`: Filtered bookmark search
//! - `storage`: Backing store contract and implementations
//! - `config`: Application configuration

pub mod bookmarks;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
mod records;
pub mod search;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tags;

pub use config::{Backend, Config};
pub use error::{Error, Result};
pub use models::{
    Bookmark, BookmarkFields, BookmarkKey, BookmarkPatch, Category, DomainBookmark, DomainCount,
    SaveAction, Saved, SearchQuery, SearchResults, Stats, SubCategory, TagCount,
};
pub use storage::{KvStore, MemoryKv, SqliteKv, StorageError};
pub use store::Store;
