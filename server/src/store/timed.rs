use std::future::Future;
use std::time::Duration;

use todo_core::{PersistedTodo, TodoPatch};
use uuid::Uuid;

use super::{StoreError, TodoStore};

/// Wraps a store so that every call gives up after `limit`.
///
/// The abandoned call is dropped, not cancelled on the server side.
#[derive(Clone, Debug)]
pub struct TimedStore<S> {
    inner: S,
    limit: Duration,
}

impl<S: TodoStore> TimedStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.limit, call)
            .await
            .map_err(|_| StoreError::Timeout(self.limit))?
    }
}

impl<S: TodoStore> TodoStore for TimedStore<S> {
    async fn insert(&self, todo: PersistedTodo) -> Result<Uuid, StoreError> {
        self.bounded(self.inner.insert(todo)).await
    }

    async fn find_all(&self) -> Result<Vec<PersistedTodo>, StoreError> {
        self.bounded(self.inner.find_all()).await
    }

    async fn update_by_id(&self, id: Uuid, patch: TodoPatch) -> Result<(), StoreError> {
        self.bounded(self.inner.update_by_id(id, patch)).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.bounded(self.inner.delete_by_id(id)).await
    }
}
