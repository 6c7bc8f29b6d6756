mod prompt;
mod sort;

pub use prompt::{Prompt, PromptUpdate};
pub use sort::SortOrder;
