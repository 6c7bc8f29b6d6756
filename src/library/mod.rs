//! The prompt collection manager.
//!
//! [`PromptLibrary`] owns the prompt and category lists, applies every
//! mutation in memory first and then writes the full collection through the
//! injected [`KeyValueStore`]. A failed write is logged and returned to the
//! caller, but the in-memory state stays authoritative for the session.

mod events;
mod views;

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::config::{LibraryConfig, DEFAULT_MOST_USED_LIMIT};
use crate::entity::{Prompt, PromptUpdate, SortOrder};
use crate::error::{PromptBuddyError, Result};
use crate::storage::KeyValueStore;

pub use events::{Change, LibraryEvent, Persistence, SubscriptionId};
pub use views::{most_used, sort_prompts};

use events::Subscribers;

/// Store key holding the JSON-encoded prompt list.
pub const PROMPTS_KEY: &str = "savedPrompts";
/// Store key holding the JSON-encoded category list.
pub const CATEGORIES_KEY: &str = "savedCategories";
/// Appended to the name of a duplicated prompt.
pub const COPY_SUFFIX: &str = " (Copy)";

/// How one key fared when the library was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Decoded successfully with this many entries.
    Loaded(usize),
    /// Nothing had been saved under the key.
    Missing,
    /// Data was present but could not be decoded.
    Corrupt(String),
    /// The store itself failed to read the key.
    Unreadable(String),
    /// Categories only: rebuilt from the loaded prompts. `cause` is set when
    /// a saved list existed but could not be read or decoded.
    Derived { count: usize, cause: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadState {
    pub prompts: LoadStatus,
    pub categories: LoadStatus,
}

pub struct PromptLibrary<S: KeyValueStore = Box<dyn KeyValueStore>> {
    store: S,
    prompts: Vec<Prompt>,
    categories: Vec<String>,
    search_text: String,
    selected_category: Option<String>,
    sort_order: SortOrder,
    most_used_limit: usize,
    load_state: LoadState,
    subscribers: Subscribers,
}

impl<S: KeyValueStore> PromptLibrary<S> {
    /// Load the library from `store` with default settings.
    ///
    /// Never fails: absent or undecodable data yields an empty collection and
    /// is recorded in [`load_state`](Self::load_state).
    pub fn open(store: S) -> Self {
        let (prompts, prompts_status) = load_prompts(&store);
        let (categories, categories_status) = load_categories(&store, &prompts);

        tracing::debug!(
            prompts = prompts.len(),
            categories = categories.len(),
            "opened prompt library"
        );

        Self {
            store,
            prompts,
            categories,
            search_text: String::new(),
            selected_category: None,
            sort_order: SortOrder::default(),
            most_used_limit: DEFAULT_MOST_USED_LIMIT,
            load_state: LoadState {
                prompts: prompts_status,
                categories: categories_status,
            },
            subscribers: Subscribers::default(),
        }
    }

    pub fn open_with_config(store: S, config: &LibraryConfig) -> Self {
        let mut library = Self::open(store);
        library.sort_order = config.default_sort;
        library.most_used_limit = config.most_used_limit;
        library
    }

    // ========== State accessors ==========

    /// All prompts in insertion order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Known categories, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn most_used_limit(&self) -> usize {
        self.most_used_limit
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Note that the backing store itself could not be opened and the
    /// library started from an empty replacement.
    pub fn record_store_failure(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.load_state = LoadState {
            prompts: LoadStatus::Unreadable(reason.clone()),
            categories: LoadStatus::Derived {
                count: self.categories.len(),
                cause: Some(reason),
            },
        };
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    // ========== Lookup ==========

    pub fn prompt(&self, id: &Uuid) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == *id)
    }

    /// Find a prompt by full id or by an unambiguous id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Prompt> {
        let needle = id_or_prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Err(PromptBuddyError::InvalidInput(
                "prompt id must not be empty".to_string(),
            ));
        }

        if let Ok(id) = Uuid::parse_str(&needle) {
            return self
                .prompt(&id)
                .ok_or_else(|| PromptBuddyError::PromptNotFound(id_or_prefix.to_string()));
        }

        let mut matches = self.prompts.iter().filter(|p| {
            p.id.to_string().starts_with(&needle) || p.id.simple().to_string().starts_with(&needle)
        });

        match (matches.next(), matches.next()) {
            (Some(prompt), None) => Ok(prompt),
            (Some(_), Some(_)) => Err(PromptBuddyError::AmbiguousId(id_or_prefix.to_string())),
            (None, _) => Err(PromptBuddyError::PromptNotFound(id_or_prefix.to_string())),
        }
    }

    // ========== Observers ==========

    /// Register a callback run after every mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&LibraryEvent) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ========== Prompt mutations ==========

    /// Append `prompt`, persist, then auto-register its category.
    pub fn add_prompt(&mut self, prompt: Prompt) -> Result<()> {
        let id = prompt.id;
        let category = prompt.category.clone();

        self.prompts.push(prompt);
        let saved = self.persist_prompts();
        self.notify(Change::PromptAdded(id), &saved);

        let registered = self.register_category(&category);
        saved.and(registered.map(|_| ()))
    }

    /// Replace the prompt with the same id, keeping its position.
    ///
    /// Returns `Ok(false)` without touching anything when the id is unknown.
    pub fn update_prompt(&mut self, prompt: Prompt) -> Result<bool> {
        let Some(index) = self.prompts.iter().position(|p| p.id == prompt.id) else {
            tracing::debug!(id = %prompt.id, "update for unknown prompt ignored");
            return Ok(false);
        };

        let id = prompt.id;
        let category = prompt.category.clone();

        self.prompts[index] = prompt;
        let saved = self.persist_prompts();
        self.notify(Change::PromptUpdated(id), &saved);

        let registered = self.register_category(&category);
        saved.and(registered).map(|_| true)
    }

    /// Remove every prompt with `id`. Returns whether anything was removed.
    pub fn delete_prompt(&mut self, id: &Uuid) -> Result<bool> {
        let before = self.prompts.len();
        self.prompts.retain(|p| p.id != *id);
        let removed = self.prompts.len() != before;

        let saved = self.persist_prompts();
        if removed {
            self.notify(Change::PromptDeleted(*id), &saved);
        }
        saved.map(|_| removed)
    }

    /// Remove `category` and every prompt filed under it.
    ///
    /// Returns the number of prompts removed.
    pub fn delete_category_and_prompts(&mut self, category: &str) -> Result<usize> {
        self.categories.retain(|c| c != category);

        let before = self.prompts.len();
        self.prompts.retain(|p| p.category != category);
        let removed_prompts = before - self.prompts.len();

        let saved = self.persist_prompts().and(self.persist_categories());
        self.notify(
            Change::CategoryDeleted {
                category: category.to_string(),
                removed_prompts,
            },
            &saved,
        );
        saved.map(|_| removed_prompts)
    }

    /// Add a copy of `prompt` with a fresh id and `" (Copy)"` appended to its name.
    ///
    /// If the write fails the copy is still in memory as the last entry of
    /// [`prompts`](Self::prompts).
    pub fn duplicate_prompt(&mut self, prompt: &Prompt) -> Result<Prompt> {
        let mut copy = prompt.clone();
        copy.id = Uuid::new_v4();
        copy.name = format!("{}{}", prompt.name, COPY_SUFFIX);

        self.add_prompt(copy.clone())?;
        Ok(copy)
    }

    /// Flip the favorite flag. Returns `Ok(false)` for an unknown id.
    pub fn toggle_favorite(&mut self, id: &Uuid) -> Result<bool> {
        let Some(mut prompt) = self.prompt(id).cloned() else {
            return Ok(false);
        };

        prompt.update(PromptUpdate {
            is_favorite: Some(!prompt.is_favorite),
            ..Default::default()
        });
        self.update_prompt(prompt)
    }

    /// Record one use of a prompt. Returns `Ok(false)` for an unknown id.
    pub fn increment_usage(&mut self, id: &Uuid) -> Result<bool> {
        let Some(prompt) = self.prompts.iter_mut().find(|p| p.id == *id) else {
            return Ok(false);
        };
        prompt.usage_count = prompt.usage_count.saturating_add(1);

        let saved = self.persist_prompts();
        self.notify(Change::UsageIncremented(*id), &saved);
        saved.map(|_| true)
    }

    /// Zero every usage counter with a single write.
    pub fn reset_all_usage(&mut self) -> Result<()> {
        for prompt in self.prompts.iter_mut() {
            prompt.usage_count = 0;
        }

        let saved = self.persist_prompts();
        self.notify(Change::UsageReset, &saved);
        saved
    }

    // ========== Categories ==========

    /// Add a category after trimming whitespace.
    ///
    /// Empty names and exact (case-sensitive) duplicates are ignored and
    /// return `Ok(false)`.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.categories.iter().any(|c| c == trimmed) {
            return Ok(false);
        }

        self.categories.push(trimmed.to_string());
        self.categories.sort();

        let saved = self.persist_categories();
        self.notify(Change::CategoryAdded(trimmed.to_string()), &saved);
        saved.map(|_| true)
    }

    /// Auto-register step run by [`add_prompt`](Self::add_prompt) and
    /// [`update_prompt`](Self::update_prompt): a category used by a prompt but
    /// not yet listed is added to the category list.
    pub fn register_category(&mut self, category: &str) -> Result<bool> {
        if self.categories.iter().any(|c| c == category) {
            return Ok(false);
        }
        self.add_category(category)
    }

    // ========== Query state ==========

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.notify_query(Change::SearchTextChanged(self.search_text.clone()));
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        self.selected_category = category;
        self.notify_query(Change::SelectedCategoryChanged(
            self.selected_category.clone(),
        ));
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.notify_query(Change::SortOrderChanged(order));
    }

    // ========== Persistence ==========

    fn persist_prompts(&mut self) -> Result<()> {
        let result = match serde_json::to_vec(&self.prompts) {
            Ok(blob) => self.store.save(PROMPTS_KEY, &blob),
            Err(e) => Err(e.into()),
        };
        if let Err(ref e) = result {
            tracing::warn!(key = PROMPTS_KEY, error = %e, "failed to persist prompts, keeping in-memory state");
        }
        result
    }

    fn persist_categories(&mut self) -> Result<()> {
        let result = match serde_json::to_vec(&self.categories) {
            Ok(blob) => self.store.save(CATEGORIES_KEY, &blob),
            Err(e) => Err(e.into()),
        };
        if let Err(ref e) = result {
            tracing::warn!(key = CATEGORIES_KEY, error = %e, "failed to persist categories, keeping in-memory state");
        }
        result
    }

    fn notify(&mut self, change: Change, saved: &Result<()>) {
        let event = LibraryEvent {
            change,
            persistence: Persistence::from_result(saved),
        };
        self.subscribers.emit(&event);
    }

    fn notify_query(&mut self, change: Change) {
        let event = LibraryEvent {
            change,
            persistence: Persistence::NotRequired,
        };
        self.subscribers.emit(&event);
    }
}

fn load_prompts<S: KeyValueStore>(store: &S) -> (Vec<Prompt>, LoadStatus) {
    match store.load(PROMPTS_KEY) {
        Ok(None) => (Vec::new(), LoadStatus::Missing),
        Ok(Some(blob)) => match serde_json::from_slice::<Vec<Prompt>>(&blob) {
            Ok(prompts) => {
                let count = prompts.len();
                (prompts, LoadStatus::Loaded(count))
            }
            Err(e) => {
                tracing::warn!(key = PROMPTS_KEY, error = %e, "stored prompts are undecodable, starting empty");
                (Vec::new(), LoadStatus::Corrupt(e.to_string()))
            }
        },
        Err(e) => {
            tracing::warn!(key = PROMPTS_KEY, error = %e, "could not read prompts, starting empty");
            (Vec::new(), LoadStatus::Unreadable(e.to_string()))
        }
    }
}

fn load_categories<S: KeyValueStore>(store: &S, prompts: &[Prompt]) -> (Vec<String>, LoadStatus) {
    let saved = match store.load(CATEGORIES_KEY) {
        Ok(None) => Err(None),
        Ok(Some(blob)) => match serde_json::from_slice::<Vec<String>>(&blob) {
            Ok(categories) => Ok(categories),
            Err(e) => {
                tracing::warn!(key = CATEGORIES_KEY, error = %e, "stored categories are undecodable, deriving from prompts");
                Err(Some(e.to_string()))
            }
        },
        Err(e) => {
            tracing::warn!(key = CATEGORIES_KEY, error = %e, "could not read categories, deriving from prompts");
            Err(Some(e.to_string()))
        }
    };

    match saved {
        Ok(mut categories) => {
            categories.sort();
            categories.dedup();
            let count = categories.len();
            (categories, LoadStatus::Loaded(count))
        }
        Err(cause) => {
            let derived: Vec<String> = prompts
                .iter()
                .map(|p| p.category.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let count = derived.len();
            (derived, LoadStatus::Derived { count, cause })
        }
    }
}
