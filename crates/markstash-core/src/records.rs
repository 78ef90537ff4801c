//! JSON values in the backing store
//!
//! Every stored value is a JSON document. A value that fails to parse is
//! an integrity failure naming its key.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::storage::KvStore;

/// Read and decode the value under `key`, if any
pub(crate) fn read<T: DeserializeOwned>(kv: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match kv.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::integrity(key, e)),
        None => Ok(None),
    }
}

/// Encode `value` and store it under `key`
pub(crate) fn write<T: Serialize + ?Sized>(kv: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| Error::integrity(key, e))?;
    kv.put(key, &raw)?;
    Ok(())
}
