mod commands;
mod handlers;

pub use commands::{CategoryAction, CategoryCommand, Cli, Commands};
pub use handlers::{
    handle_add, handle_category_add, handle_category_delete, handle_category_list, handle_delete,
    handle_duplicate, handle_favorite, handle_favorites, handle_get, handle_init, handle_list,
    handle_most_used, handle_reset_usage, handle_search, handle_update, handle_use,
};
