use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "promptbuddy")]
#[command(version, about = "A local library for the prompts you reuse")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new prompt library in the current directory
    Init {
        /// Storage backend (loro, sqlite)
        #[arg(long, default_value = "loro")]
        backend: String,
    },

    /// Add a new prompt
    Add {
        /// Prompt name
        name: String,

        /// Category the prompt is filed under
        #[arg(long, short = 'c')]
        category: String,

        /// Prompt text
        #[arg(long, conflicts_with = "stdin")]
        content: Option<String>,

        /// Read prompt text from stdin
        #[arg(long)]
        stdin: bool,

        /// Mark as favorite
        #[arg(long)]
        favorite: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List prompts
    List {
        /// Only prompts whose name contains this text
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Only prompts in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Sort order (name, created, updated)
        #[arg(long)]
        sort: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single prompt
    Get {
        /// Prompt ID or unique ID prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a prompt's text and count the use
    Use {
        /// Prompt ID or unique ID prefix
        id: String,
    },

    /// Edit a prompt
    Update {
        /// Prompt ID or unique ID prefix
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// New prompt text
        #[arg(long, conflicts_with = "stdin")]
        content: Option<String>,

        /// Read new prompt text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a prompt
    Delete {
        /// Prompt ID or unique ID prefix
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Copy a prompt under a new ID
    Duplicate {
        /// Prompt ID or unique ID prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle a prompt's favorite flag
    Favorite {
        /// Prompt ID or unique ID prefix
        id: String,
    },

    /// List favorite prompts
    Favorites {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the most used prompts
    MostUsed {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset every usage counter to zero
    ResetUsage,

    /// Search prompt names and text
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage categories
    Category(CategoryCommand),
}

#[derive(Args, Debug)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },

    /// List categories with prompt counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a category and every prompt in it
    Delete {
        /// Category name
        name: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}
