use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptBuddyError {
    #[error("Not in a promptbuddy library. Run 'promptbuddy init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .promptbuddy/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Ambiguous prompt id '{0}' matches more than one prompt")]
    AmbiguousId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Loro error: {0}")]
    Loro(#[from] loro::LoroError),

    #[error("Loro encode error: {0}")]
    LoroEncode(#[from] loro::LoroEncodeError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, PromptBuddyError>;
