pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod library;
pub mod project;
pub mod storage;

pub use entity::{Prompt, PromptUpdate, SortOrder};
pub use error::{PromptBuddyError, Result};
pub use library::PromptLibrary;
pub use storage::KeyValueStore;
