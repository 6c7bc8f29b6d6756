use std::fs;
use std::path::{Path, PathBuf};

use loro::{LoroDoc, LoroValue, ValueOrContainer};

use super::KeyValueStore;
use crate::error::{PromptBuddyError, Result};

/// Root map holding every key.
const KV_MAP: &str = "kv";

/// Key-value store backed by a Loro document, exported as a snapshot to a
/// single file on every save.
pub struct LoroKvStore {
    doc: LoroDoc,
    path: PathBuf,
}

impl LoroKvStore {
    /// Open the document at `path`, starting empty if the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = LoroDoc::new();

        if path.exists() {
            let bytes = fs::read(path)?;
            doc.import(&bytes)?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "imported loro snapshot");
        }

        Ok(Self {
            doc,
            path: path.to_path_buf(),
        })
    }

    /// Create the file immediately with an empty document.
    pub fn create(path: &Path) -> Result<Self> {
        let store = Self::open(path)?;
        store.flush()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document snapshot to disk.
    fn flush(&self) -> Result<()> {
        let bytes = self.doc.export(loro::ExportMode::Snapshot)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl KeyValueStore for LoroKvStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let kv = self.doc.get_map(KV_MAP);

        match kv.get(key) {
            None => Ok(None),
            Some(ValueOrContainer::Value(LoroValue::Binary(bytes))) => Ok(Some(bytes.to_vec())),
            Some(ValueOrContainer::Value(LoroValue::String(s))) => {
                Ok(Some(s.to_string().into_bytes()))
            }
            Some(_) => Err(PromptBuddyError::Storage(format!(
                "Unexpected value type under key '{}'",
                key
            ))),
        }
    }

    fn save(&mut self, key: &str, blob: &[u8]) -> Result<()> {
        let kv = self.doc.get_map(KV_MAP);
        kv.insert(key, blob.to_vec())?;
        self.doc.commit();
        self.flush()?;
        tracing::debug!(key, bytes = blob.len(), "saved to loro store");
        Ok(())
    }
}
