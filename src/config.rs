use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::SortOrder;
use crate::error::Result;

pub const CONFIG_FILE: &str = "config.yaml";

/// Default size of the most-used list.
pub const DEFAULT_MOST_USED_LIMIT: usize = 20;

/// Which [`KeyValueStore`](crate::storage::KeyValueStore) backs a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Loro,
    Sqlite,
}

impl Backend {
    /// File name of the store inside the library directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Backend::Loro => "library.loro",
            Backend::Sqlite => "library.db",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Loro => write!(f, "loro"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loro" => Ok(Backend::Loro),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(format!("Invalid backend: {} (expected loro or sqlite)", s)),
        }
    }
}

/// Per-library settings stored in `.promptbuddy/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub backend: Backend,
    /// Maximum number of entries in the most-used list.
    pub most_used_limit: usize,
    /// Sort order applied when none is given explicitly.
    pub default_sort: SortOrder,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            most_used_limit: DEFAULT_MOST_USED_LIMIT,
            default_sort: SortOrder::default(),
        }
    }
}

impl LibraryConfig {
    /// Read the config from `dir`, falling back to defaults when the file is absent.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }
}
