//! On-disk library layout: a `.promptbuddy/` directory holding the config
//! file and the backing store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Backend, LibraryConfig};
use crate::error::{PromptBuddyError, Result};
use crate::library::PromptLibrary;
use crate::storage::{KeyValueStore, LoroKvStore, MemoryStore, SqliteKvStore};

pub const PROJECT_DIR: &str = ".promptbuddy";

/// Appended to the file name of a store that could not be opened.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

pub struct Project {
    dir: PathBuf,
    config: LibraryConfig,
}

impl Project {
    /// Create `.promptbuddy/` under `root` with a fresh config and empty store.
    pub fn init(root: &Path, backend: Backend) -> Result<Self> {
        let dir = root.join(PROJECT_DIR);
        if dir.exists() {
            return Err(PromptBuddyError::AlreadyInitialized);
        }
        fs::create_dir_all(&dir)?;

        let config = LibraryConfig {
            backend,
            ..Default::default()
        };
        config.save(&dir)?;

        let project = Self { dir, config };
        match backend {
            Backend::Loro => {
                LoroKvStore::create(&project.store_path())?;
            }
            Backend::Sqlite => {
                SqliteKvStore::open(&project.store_path())?;
            }
        }

        tracing::info!(dir = %project.dir.display(), %backend, "initialized prompt library");
        Ok(project)
    }

    /// Open an existing library rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(PROJECT_DIR);
        if !dir.is_dir() {
            return Err(PromptBuddyError::NotInitialized);
        }

        let config = LibraryConfig::load(&dir)?;
        Ok(Self { dir, config })
    }

    /// Walk up from `start` to the first directory containing `.promptbuddy/`.
    /// Falls back to `start` itself.
    pub fn find_root(start: &Path) -> PathBuf {
        let mut current = start;
        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return current.to_path_buf();
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return start.to_path_buf(),
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.join(self.config.backend.file_name())
    }

    /// Open the backend named in the config.
    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        let path = self.store_path();
        let store: Box<dyn KeyValueStore> = match self.config.backend {
            Backend::Loro => Box::new(LoroKvStore::open(&path)?),
            Backend::Sqlite => Box::new(SqliteKvStore::open(&path)?),
        };
        Ok(store)
    }

    /// Open the library, starting empty if the store file cannot be read.
    ///
    /// A damaged store file is moved aside to `<file>.corrupt` so the next
    /// write cannot overwrite it. If even that fails the session runs on an
    /// in-memory store.
    pub fn open_library(&self) -> Result<PromptLibrary> {
        let (store, failure) = match self.open_store() {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::warn!(path = %self.store_path().display(), error = %e, "store is unreadable, starting with an empty library");
                (self.recover_store(), Some(e.to_string()))
            }
        };

        let mut library = PromptLibrary::open_with_config(store, &self.config);
        if let Some(reason) = failure {
            library.record_store_failure(reason);
        }
        Ok(library)
    }

    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.config.backend.file_name().to_string();
        name.push_str(CORRUPT_SUFFIX);
        self.dir.join(name)
    }

    fn recover_store(&self) -> Box<dyn KeyValueStore> {
        let path = self.store_path();
        let backup = self.corrupt_path();

        if let Err(e) = fs::rename(&path, &backup) {
            tracing::warn!(error = %e, "could not move damaged store aside, changes will not be saved");
            return Box::new(MemoryStore::new());
        }
        tracing::warn!(backup = %backup.display(), "moved damaged store aside");

        match self.open_store() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "could not open a fresh store, changes will not be saved");
                Box::new(MemoryStore::new())
            }
        }
    }
}
