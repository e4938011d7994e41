//! Domain types and request/response DTOs for the todo service.
//!
//! # Design
//! Two shapes describe an item. `PersistedTodo` is what the storage layer
//! holds: a typed `Uuid` id and a UTC timestamp. `WireTodo` is what crosses
//! the HTTP boundary: the id rendered as a string and every field defaulted,
//! so a create body carrying only `title` still deserializes and validation
//! can report a missing title as a domain error rather than a parse error.
//! `crate::mapper` converts between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A todo item as stored in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTodo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A todo item as it appears in JSON request and response bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request payload for `PUT /todo/`. `id` selects the document; the other
/// fields are applied only when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

// An explicit `null` means the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The mutable subset of a `PersistedTodo`, validated and ready for the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }

    /// Apply the patch to an item in place. `id` and `created_at` are never
    /// touched.
    pub fn apply(&self, todo: &mut PersistedTodo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// Body of `GET /todo/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<WireTodo>,
}

/// Body of a successful `POST /todo/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub todo_id: String,
}

/// Confirmation body for update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every error response. `error` carries the underlying detail when
/// there is one (a JSON parse failure, a store error).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_todo_defaults_every_field() {
        let todo: WireTodo = serde_json::from_str("{}").unwrap();
        assert_eq!(todo, WireTodo::default());
    }

    #[test]
    fn wire_todo_accepts_create_body() {
        let todo: WireTodo = serde_json::from_str(r#"{"title":"buy milk"}"#).unwrap();
        assert_eq!(todo.title, "buy milk");
        assert!(todo.id.is_empty());
        assert!(!todo.completed);
        assert!(todo.created_at.is_none());
    }

    #[test]
    fn wire_todo_treats_null_as_absent() {
        let todo: WireTodo =
            serde_json::from_str(r#"{"id":null,"title":null,"completed":null,"created_at":null}"#)
                .unwrap();
        assert_eq!(todo, WireTodo::default());

        let input: UpdateTodo = serde_json::from_str(r#"{"id":null,"completed":true}"#).unwrap();
        assert!(input.id.is_empty());
    }

    #[test]
    fn wire_todo_rejects_wrong_types() {
        let result: Result<WireTodo, _> = serde_json::from_str(r#"{"title":42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn wire_todo_serializes_created_at_as_rfc3339() {
        let todo = WireTodo {
            id: Uuid::nil().to_string(),
            title: "Test".to_string(),
            completed: true,
            created_at: Some("2024-05-01T12:30:00Z".parse().unwrap()),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["completed"], true);
        assert_eq!(json["created_at"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn update_todo_fields_are_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(input.id, "abc");
        assert!(input.title.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn patch_leaves_absent_fields_alone() {
        let mut todo = PersistedTodo {
            id: Uuid::nil(),
            title: "Walk dog".to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        let before = todo.clone();

        TodoPatch { title: None, completed: Some(true) }.apply(&mut todo);
        assert_eq!(todo.title, "Walk dog");
        assert!(todo.completed);
        assert_eq!(todo.id, before.id);
        assert_eq!(todo.created_at, before.created_at);
    }

    #[test]
    fn error_response_omits_missing_detail() {
        let body = ErrorResponse {
            message: "the title is required".to_string(),
            error: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("error").is_none());
    }
}
