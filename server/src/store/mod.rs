//! Storage adapter for the todo collection.
//!
//! # Design
//! Handlers talk to the document store only through [`TodoStore`]. The trait
//! is implemented by [`RedisStore`] for production and by [`MemoryStore`] for
//! tests and local runs, so the router is built once and works over either.
//!
//! Every method is a single round trip. Nothing is retried; a backend failure
//! is handed back as [`StoreError::Backend`] without interpretation.
//! [`TimedStore`] puts a deadline on each call.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use todo_core::{PersistedTodo, TodoPatch};
use uuid::Uuid;

pub mod memory;
pub mod redis;
pub mod timed;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;
pub use self::timed::TimedStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this id exists in the collection.
    #[error("todo {0} not found")]
    NotFound(Uuid),

    /// The document store failed or could not be reached.
    #[error("document store error: {0}")]
    Backend(#[from] ::redis::RedisError),

    /// The store did not answer in time.
    #[error("document store did not answer within {0:?}")]
    Timeout(Duration),

    /// A stored document could not be decoded into a todo.
    #[error("corrupt document {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Operations the handlers need from the document store.
///
/// Implementations are cheap to clone; each clone shares the same underlying
/// connection or map.
pub trait TodoStore: Clone + Send + Sync + 'static {
    /// Insert a new document and return its id.
    fn insert(&self, todo: PersistedTodo) -> impl Future<Output = Result<Uuid, StoreError>> + Send;

    /// Fetch every document in the store's natural order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<PersistedTodo>, StoreError>> + Send;

    /// Apply `patch` to the document with `id`.
    fn update_by_id(
        &self,
        id: Uuid,
        patch: TodoPatch,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove the document with `id`.
    fn delete_by_id(&self, id: Uuid) -> impl Future<Output = Result<(), StoreError>> + Send;
}
