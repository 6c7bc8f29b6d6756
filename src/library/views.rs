//! Derived, read-only projections of the prompt list.
//!
//! None of these reorder or persist the underlying collection.

use crate::entity::{Prompt, SortOrder};
use crate::storage::KeyValueStore;

use super::PromptLibrary;

/// Stable sort of borrowed prompts by `order`.
pub fn sort_prompts(prompts: &mut [&Prompt], order: SortOrder) {
    match order {
        SortOrder::Name => prompts.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Created => prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Updated => prompts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
}

/// Top `limit` prompts by usage count, highest first.
///
/// When nothing has been used yet the list falls back to name order.
pub fn most_used(prompts: &[Prompt], limit: usize) -> Vec<&Prompt> {
    let mut ranked: Vec<&Prompt> = prompts.iter().collect();

    if ranked.iter().all(|p| p.usage_count == 0) {
        sort_prompts(&mut ranked, SortOrder::Name);
    } else {
        ranked.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    }

    ranked.truncate(limit);
    ranked
}

impl<S: KeyValueStore> PromptLibrary<S> {
    /// Prompts matching the current search text and category filter, in
    /// the current sort order.
    pub fn filtered_prompts(&self) -> Vec<&Prompt> {
        let mut matches: Vec<&Prompt> = self
            .prompts
            .iter()
            .filter(|p| self.search_text.is_empty() || p.name_contains(&self.search_text))
            .filter(|p| {
                self.selected_category
                    .as_deref()
                    .map_or(true, |category| p.category == category)
            })
            .collect();

        sort_prompts(&mut matches, self.sort_order);
        matches
    }

    /// Every prompt in `order`.
    pub fn sorted_prompts(&self, order: SortOrder) -> Vec<&Prompt> {
        let mut all: Vec<&Prompt> = self.prompts.iter().collect();
        sort_prompts(&mut all, order);
        all
    }

    /// Favorites in storage order.
    pub fn favorite_prompts(&self) -> Vec<&Prompt> {
        self.prompts.iter().filter(|p| p.is_favorite).collect()
    }

    pub fn most_used_prompts(&self) -> Vec<&Prompt> {
        most_used(&self.prompts, self.most_used_limit)
    }

    /// Prompts filed under `category`, in storage order.
    pub fn prompts_in_category(&self, category: &str) -> Vec<&Prompt> {
        self.prompts
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Name-or-content search. A blank query returns everything.
    pub fn search(&self, query: &str) -> Vec<&Prompt> {
        let query = query.trim();
        if query.is_empty() {
            return self.prompts.iter().collect();
        }
        self.prompts
            .iter()
            .filter(|p| p.matches_query(query))
            .collect()
    }

    /// Each listed category with the number of prompts filed under it.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.categories
            .iter()
            .map(|category| {
                let count = self
                    .prompts
                    .iter()
                    .filter(|p| &p.category == category)
                    .count();
                (category.clone(), count)
            })
            .collect()
    }
}
