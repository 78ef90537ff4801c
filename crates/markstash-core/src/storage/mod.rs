//! Backing store layer
//!
//! The engine only assumes single-key get/put/delete and listing keys by
//! prefix. There are no multi-key transactions: every write operation in
//! the engine is a sequence of independent single-key writes.
//!
//! ## Backends
//!
//! - **SQLite**: one `kv` table in a file under the data directory
//! - **Memory**: ordered map, for tests and throwaway servers
//!
//! ## Layout
//!
//! See [`keys`] for how partitions, categories and the tag list map onto
//! key names.

pub mod error;
pub mod keys;
pub mod memory;
mod schema;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

/// Minimal key-value contract the engine is written against
///
/// Puts are last-write-wins. `list` returns key names (not values) in
/// ascending byte order.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// List every key starting with `prefix`
    fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
