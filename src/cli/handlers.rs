use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::config::Backend;
use crate::entity::{Prompt, PromptUpdate, SortOrder};
use crate::error::{PromptBuddyError, Result};
use crate::library::PromptLibrary;
use crate::project::Project;

fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn open_library() -> Result<PromptLibrary> {
    let root = Project::find_root(&current_dir());
    Project::open(&root)?.open_library()
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

/// Reject blank input before it reaches the library.
fn require_text(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(PromptBuddyError::InvalidInput(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(value)
}

/// Ask for y/N on a terminal. Non-interactive callers must pass --force.
fn confirm(question: &str) -> Result<bool> {
    eprintln!("{} [y/N] ", question);

    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    } else {
        Err(PromptBuddyError::InvalidInput(
            "Use --force to delete in non-interactive mode".to_string(),
        ))
    }
}

fn print_prompt_line(prompt: &Prompt) {
    let star = if prompt.is_favorite { " *" } else { "" };
    println!(
        "  {} [{}] {}{} (used {}x)",
        prompt.short_id(),
        prompt.category,
        prompt.name,
        star,
        prompt.usage_count
    );
}

fn print_prompt_list(title: &str, empty: &str, prompts: &[&Prompt], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(prompts)?);
    } else if prompts.is_empty() {
        println!("{}", empty);
    } else {
        println!("{}:\n", title);
        for prompt in prompts {
            print_prompt_line(prompt);
        }
    }
    Ok(())
}

pub fn handle_init(backend: String) -> Result<()> {
    let backend: Backend = backend.parse().map_err(PromptBuddyError::InvalidInput)?;
    let root = env::current_dir()?;

    let project = Project::init(&root, backend)?;

    println!(
        "Initialized prompt library in {} ({} backend)",
        project.dir().display(),
        backend
    );
    Ok(())
}

pub fn handle_add(
    name: String,
    category: String,
    content: Option<String>,
    stdin: bool,
    favorite: bool,
    json: bool,
) -> Result<()> {
    let name = require_text("name", name)?.trim().to_string();
    let category = require_text("category", category)?.trim().to_string();
    let content = if stdin {
        read_stdin()?
    } else {
        content.unwrap_or_default()
    };
    let content = require_text("content", content)?;

    let mut library = open_library()?;
    let prompt = Prompt::new(name, content, category).with_favorite(favorite);
    library.add_prompt(prompt.clone())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prompt)?);
    } else {
        println!(
            "Created prompt ({}) [{}] {}",
            prompt.short_id(),
            prompt.category,
            prompt.name
        );
    }
    Ok(())
}

pub fn handle_list(
    search: Option<String>,
    category: Option<String>,
    sort: Option<String>,
    json: bool,
) -> Result<()> {
    let mut library = open_library()?;

    if let Some(sort) = sort {
        let order: SortOrder = sort.parse().map_err(PromptBuddyError::InvalidInput)?;
        library.set_sort_order(order);
    }
    if let Some(search) = search {
        library.set_search_text(search);
    }
    library.set_selected_category(category);

    print_prompt_list(
        "Prompts",
        "No prompts found.",
        &library.filtered_prompts(),
        json,
    )
}

pub fn handle_get(id: String, json: bool) -> Result<()> {
    let library = open_library()?;
    let prompt = library.resolve(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(prompt)?);
    } else {
        println!("Prompt {}", prompt.id);
        println!("Name: {}", prompt.name);
        println!("Category: {}", prompt.category);
        println!("Favorite: {}", if prompt.is_favorite { "yes" } else { "no" });
        println!("Used: {} times", prompt.usage_count);
        println!("Created: {}", prompt.created_at.format("%Y-%m-%d %H:%M"));
        println!("Updated: {}", prompt.updated_at.format("%Y-%m-%d %H:%M"));
        println!("\n{}", prompt.content);
    }
    Ok(())
}

pub fn handle_use(id: String) -> Result<()> {
    let mut library = open_library()?;
    let prompt = library.resolve(&id)?.clone();

    library.increment_usage(&prompt.id)?;

    println!("{}", prompt.content);
    Ok(())
}

pub fn handle_update(
    id: String,
    name: Option<String>,
    category: Option<String>,
    content: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let content = if stdin { Some(read_stdin()?) } else { content };

    let patch = PromptUpdate {
        name: name
            .map(|n| require_text("name", n).map(|n| n.trim().to_string()))
            .transpose()?,
        content: content.map(|c| require_text("content", c)).transpose()?,
        category: category
            .map(|c| require_text("category", c).map(|c| c.trim().to_string()))
            .transpose()?,
        is_favorite: None,
    };
    if patch.name.is_none() && patch.content.is_none() && patch.category.is_none() {
        return Err(PromptBuddyError::InvalidInput(
            "Nothing to update. Pass --name, --category, --content or --stdin".to_string(),
        ));
    }

    let mut library = open_library()?;
    let mut prompt = library.resolve(&id)?.clone();
    prompt.update(patch);

    if !library.update_prompt(prompt.clone())? {
        return Err(PromptBuddyError::PromptNotFound(id));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&prompt)?);
    } else {
        println!(
            "Updated prompt ({}) [{}] {}",
            prompt.short_id(),
            prompt.category,
            prompt.name
        );
    }
    Ok(())
}

pub fn handle_delete(id: String, force: bool) -> Result<()> {
    let mut library = open_library()?;
    let prompt = library.resolve(&id)?.clone();

    if !force && !confirm(&format!("Delete prompt ({}) {}?", prompt.short_id(), prompt.name))? {
        println!("Cancelled.");
        return Ok(());
    }

    library.delete_prompt(&prompt.id)?;

    println!("Deleted prompt ({}) {}", prompt.short_id(), prompt.name);
    Ok(())
}

pub fn handle_duplicate(id: String, json: bool) -> Result<()> {
    let mut library = open_library()?;
    let original = library.resolve(&id)?.clone();

    let copy = library.duplicate_prompt(&original)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&copy)?);
    } else {
        println!("Created prompt ({}) {}", copy.short_id(), copy.name);
    }
    Ok(())
}

pub fn handle_favorite(id: String) -> Result<()> {
    let mut library = open_library()?;
    let prompt_id = library.resolve(&id)?.id;

    library.toggle_favorite(&prompt_id)?;

    if let Some(prompt) = library.prompt(&prompt_id) {
        let state = if prompt.is_favorite {
            "Added to"
        } else {
            "Removed from"
        };
        println!("{} favorites: ({}) {}", state, prompt.short_id(), prompt.name);
    }
    Ok(())
}

pub fn handle_favorites(json: bool) -> Result<()> {
    let library = open_library()?;
    print_prompt_list(
        "Favorites",
        "No favorite prompts yet.",
        &library.favorite_prompts(),
        json,
    )
}

pub fn handle_most_used(json: bool) -> Result<()> {
    let library = open_library()?;
    print_prompt_list(
        "Most used",
        "No prompts found.",
        &library.most_used_prompts(),
        json,
    )
}

pub fn handle_reset_usage() -> Result<()> {
    let mut library = open_library()?;
    library.reset_all_usage()?;

    println!("Reset usage for {} prompts.", library.len());
    Ok(())
}

pub fn handle_search(query: String, json: bool) -> Result<()> {
    let library = open_library()?;
    let results = library.search(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No results found for '{}'.", query);
    } else {
        println!("Search results for '{}':\n", query);
        for prompt in results {
            print_prompt_line(prompt);
        }
    }
    Ok(())
}

pub fn handle_category_add(name: String) -> Result<()> {
    let mut library = open_library()?;

    if library.add_category(&name)? {
        println!("Added category {}", name.trim());
    } else if name.trim().is_empty() {
        return Err(PromptBuddyError::InvalidInput(
            "category must not be empty".to_string(),
        ));
    } else {
        println!("Category {} already exists.", name.trim());
    }
    Ok(())
}

pub fn handle_category_list(json: bool) -> Result<()> {
    let library = open_library()?;
    let counts = library.category_counts();

    if json {
        #[derive(serde::Serialize)]
        struct CategoryJson {
            name: String,
            prompts: usize,
        }

        let json_counts: Vec<CategoryJson> = counts
            .into_iter()
            .map(|(name, prompts)| CategoryJson { name, prompts })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_counts)?);
    } else if counts.is_empty() {
        println!("No categories found.");
    } else {
        println!("Categories:\n");
        for (name, count) in counts {
            println!("  {} ({})", name, count);
        }
    }
    Ok(())
}

pub fn handle_category_delete(name: String, force: bool) -> Result<()> {
    let mut library = open_library()?;

    let listed = library.categories().iter().any(|c| *c == name);
    let filed = library.prompts_in_category(&name).len();
    if !listed && filed == 0 {
        return Err(PromptBuddyError::InvalidInput(format!(
            "Unknown category: {}",
            name
        )));
    }

    if !force
        && !confirm(&format!(
            "Delete category {} and its {} prompt(s)? This cannot be undone.",
            name, filed
        ))?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = library.delete_category_and_prompts(&name)?;

    println!("Deleted category {} and {} prompt(s)", name, removed);
    Ok(())
}
