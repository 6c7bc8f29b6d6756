//! Key-value persistence backends.
//!
//! The library writes whole serialized snapshots under a handful of string
//! keys; a backend only has to store and return opaque blobs.

mod loro_store;
mod sqlite_store;

use std::collections::HashMap;

use crate::error::Result;

pub use loro_store::LoroKvStore;
pub use sqlite_store::SqliteKvStore;

/// Durable byte store addressed by string keys.
pub trait KeyValueStore {
    /// Fetch the blob stored under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`.
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()>;
}

impl KeyValueStore for Box<dyn KeyValueStore> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()> {
        (**self).save(key, blob)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly, bypassing the library.
    pub fn with_entry(mut self, key: &str, blob: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.to_string(), blob.into());
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}
