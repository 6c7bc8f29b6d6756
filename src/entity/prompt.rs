// src/entity/prompt.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-authored, named text snippet.
///
/// Records are stored with camelCase keys. `usageCount` and `isFavorite`
/// fall back to their defaults when absent so libraries written before
/// favorites existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    /// Free-form label. It does not have to appear in the category list.
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Field patch for [`Prompt::update`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PromptUpdate {
    pub name: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub is_favorite: Option<bool>,
}

impl Prompt {
    /// Create a prompt with a fresh id and `created_at == updated_at`.
    ///
    /// Emptiness of `name`, `content` and `category` is not checked here;
    /// callers reject blank input before constructing.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: content.into(),
            category: category.into(),
            created_at: now,
            updated_at: now,
            usage_count: 0,
            is_favorite: false,
        }
    }

    pub fn with_usage_count(mut self, usage_count: u32) -> Self {
        self.usage_count = usage_count;
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Apply the fields present in `patch` and refresh `updated_at`.
    pub fn update(&mut self, patch: PromptUpdate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(is_favorite) = patch.is_favorite {
            self.is_favorite = is_favorite;
        }
        self.touch();
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Case-insensitive substring match on the name only.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Case-insensitive substring match on name or content.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.content.to_lowercase().contains(&query)
    }

    /// First eight hex digits of the id, for display.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_prompt_defaults() {
        let prompt = Prompt::new("Summary", "Summarize this", "Writing");

        assert_eq!(prompt.created_at, prompt.updated_at);
        assert_eq!(prompt.usage_count, 0);
        assert!(!prompt.is_favorite);
        assert_eq!(prompt.category, "Writing");
    }

    #[test]
    fn test_new_prompts_get_distinct_ids() {
        let a = Prompt::new("A", "a", "x");
        let b = Prompt::new("A", "a", "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_builder_helpers() {
        let prompt = Prompt::new("A", "a", "x")
            .with_usage_count(4)
            .with_favorite(true);
        assert_eq!(prompt.usage_count, 4);
        assert!(prompt.is_favorite);
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut prompt = Prompt::new("Old", "Body", "Code");
        let created = prompt.created_at;

        prompt.update(PromptUpdate {
            name: Some("New".to_string()),
            ..Default::default()
        });

        assert_eq!(prompt.name, "New");
        assert_eq!(prompt.content, "Body");
        assert_eq!(prompt.category, "Code");
        assert_eq!(prompt.created_at, created);
        assert!(prompt.updated_at >= prompt.created_at);
    }

    #[test]
    fn test_update_does_not_check_category() {
        let mut prompt = Prompt::new("Name", "Body", "Code");
        prompt.update(PromptUpdate {
            category: Some("Nowhere".to_string()),
            is_favorite: Some(true),
            ..Default::default()
        });
        assert_eq!(prompt.category, "Nowhere");
        assert!(prompt.is_favorite);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut prompt = Prompt::new("Name", "Body", "Code");
        let future = Utc::now() + chrono::Duration::hours(1);
        prompt.updated_at = future;

        prompt.touch();

        assert_eq!(prompt.updated_at, future);
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let prompt = Prompt::new("Changelog Generator", "x", "Code");
        assert!(prompt.name_contains("log"));
        assert!(prompt.name_contains("CHANGE"));
        assert!(!prompt.name_contains("summary"));
    }

    #[test]
    fn test_matches_query_searches_content() {
        let prompt = Prompt::new("Review", "Check this diff for bugs", "Code");
        assert!(prompt.matches_query("DIFF"));
        assert!(prompt.matches_query("review"));
        assert!(!prompt.matches_query("poem"));
    }

    #[test]
    fn test_short_id_is_eight_chars() {
        let prompt = Prompt::new("A", "a", "x");
        assert_eq!(prompt.short_id().len(), 8);
        assert!(prompt.id.to_string().starts_with(&prompt.short_id()));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let prompt = Prompt::new("A", "a", "x");
        let json = serde_json::to_string(&prompt).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"usageCount\""));
        assert!(json.contains("\"isFavorite\""));
    }

    #[test]
    fn test_deserialize_without_favorite_field() {
        let json = r#"{
            "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
            "name": "Legacy",
            "content": "Old record",
            "category": "Misc",
            "createdAt": "2025-05-18T10:00:00Z",
            "updatedAt": "2025-05-18T10:00:00Z",
            "usageCount": 3
        }"#;
        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt.name, "Legacy");
        assert_eq!(prompt.usage_count, 3);
        assert!(!prompt.is_favorite);
    }
}
