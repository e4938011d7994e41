//! Conversions between wire items and persisted items.
//!
//! # Design
//! `to_wire` is total. The inbound direction has two entry points:
//! `new_item` builds a fresh item for creation and ignores whatever id,
//! completed flag or timestamp the client sent, while `to_persisted` is the
//! exact inverse of `to_wire` and keeps them. Both reject an empty title.

use chrono::Utc;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{PersistedTodo, TodoPatch, UpdateTodo, WireTodo};

pub fn to_wire(todo: &PersistedTodo) -> WireTodo {
    WireTodo {
        id: todo.id.to_string(),
        title: todo.title.clone(),
        completed: todo.completed,
        created_at: Some(todo.created_at),
    }
}

/// Build the item to insert for a create request.
///
/// The id is freshly generated, `completed` starts out false and `created_at`
/// is the current server time, regardless of what the client supplied.
pub fn new_item(wire: WireTodo) -> Result<PersistedTodo, ValidationError> {
    let title = require_title(wire.title)?;
    Ok(PersistedTodo {
        id: Uuid::new_v4(),
        title,
        completed: false,
        created_at: Utc::now(),
    })
}

/// Convert a complete wire item back into its persisted form.
pub fn to_persisted(wire: WireTodo) -> Result<PersistedTodo, ValidationError> {
    let id = parse_id(&wire.id)?;
    let title = require_title(wire.title)?;
    let created_at = wire.created_at.ok_or(ValidationError::MissingCreatedAt)?;
    Ok(PersistedTodo {
        id,
        title,
        completed: wire.completed,
        created_at,
    })
}

/// Parse a client-supplied id. Surrounding whitespace is ignored.
pub fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingId);
    }
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()))
}

/// Validate an update request into the target id and the fields to change.
pub fn to_patch(input: UpdateTodo) -> Result<(Uuid, TodoPatch), ValidationError> {
    let id = parse_id(&input.id)?;
    let title = input.title.map(require_title).transpose()?;
    let patch = TodoPatch {
        title,
        completed: input.completed,
    };
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }
    Ok((id, patch))
}

fn require_title(title: String) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title)
}
