//! Domain core for the todo service.
//!
//! # Overview
//! Defines the persisted and wire shapes of a todo item, the mapper between
//! them, and the per-operation request/response bodies. Nothing here touches
//! the network or the document store, so every rule is testable in isolation.
//!
//! # Design
//! - `PersistedTodo` uses typed fields (`Uuid`, `DateTime<Utc>`); `WireTodo`
//!   uses JSON-friendly ones with defaults so validation, not serde, decides
//!   what a missing field means.
//! - Validation lives in `mapper` and fails with `ValidationError`; the
//!   server crate maps it onto HTTP status codes.

pub mod error;
pub mod mapper;
pub mod types;

pub use error::ValidationError;
pub use types::{
    CreatedResponse, ErrorResponse, ListResponse, MessageResponse, PersistedTodo, TodoPatch,
    UpdateTodo, WireTodo,
};
