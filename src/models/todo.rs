use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a todo item as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier for the todo (UUID v4).
    pub id: Uuid,
    /// Identifier of the owning user. Never serialized.
    #[serde(skip_serializing, default)]
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Partial update for a todo. Only the fields listed here can be changed; any other
/// key in the request body is rejected during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TodoPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl Todo {
    /// Creates a new, not yet completed `Todo` owned by `user_id`.
    pub fn new(input: TodoInput, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            completed: false,
            // Postgres keeps microseconds; match it so stored and returned values agree.
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Applies every field present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_todo_creation() {
        let owner = Uuid::new_v4();
        let todo = Todo::new(
            TodoInput {
                title: "buy milk".to_string(),
                description: Some("2 litres".to_string()),
            },
            owner,
        );
        assert_eq!(todo.title, "buy milk");
        assert_eq!(todo.user_id, owner);
        assert!(!todo.completed);
        assert_eq!(todo.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_todo_input_validation() {
        assert!(input("Valid title").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let long_description = TodoInput {
            title: "ok".to_string(),
            description: Some("b".repeat(1001)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut todo = Todo::new(input("original"), Uuid::new_v4());
        let before = todo.clone();

        todo.apply(&TodoPatch {
            completed: Some(true),
            ..Default::default()
        });
        assert!(todo.completed);
        assert_eq!(todo.title, before.title);
        assert_eq!(todo.description, before.description);
        assert_eq!(todo.created_at, before.created_at);

        todo.apply(&TodoPatch {
            title: Some("renamed".to_string()),
            description: Some("now described".to_string()),
            completed: None,
        });
        assert_eq!(todo.title, "renamed");
        assert_eq!(todo.description.as_deref(), Some("now described"));
        assert!(todo.completed);
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let ok: TodoPatch = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert_eq!(ok.completed, Some(true));

        let injected = serde_json::from_str::<TodoPatch>(r#"{"user_id": "someone-else"}"#);
        assert!(injected.is_err());

        let empty: TodoPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TodoPatch::default());
    }

    #[test]
    fn test_serialized_todo_hides_owner() {
        let todo = Todo::new(input("private"), Uuid::new_v4());
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("user_id").is_none());
        assert_eq!(json["completed"], false);
        assert!(json["created_at"].is_string());
    }
}
