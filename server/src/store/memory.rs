use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use todo_core::{PersistedTodo, TodoPatch};
use uuid::Uuid;

use super::{StoreError, TodoStore};

/// In-process store backed by a shared map. Contents vanish with the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<Uuid, PersistedTodo>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

impl TodoStore for MemoryStore {
    async fn insert(&self, todo: PersistedTodo) -> Result<Uuid, StoreError> {
        let id = todo.id;
        self.todos.write().await.insert(id, todo);
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<PersistedTodo>, StoreError> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn update_by_id(&self, id: Uuid, patch: TodoPatch) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        let todo = todos.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(todo);
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        todos.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn todo(title: &str) -> PersistedTodo {
        PersistedTodo {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_find_all() {
        let store = MemoryStore::new();
        let item = todo("buy milk");
        let id = store.insert(item.clone()).await.unwrap();

        assert_eq!(id, item.id);
        assert_eq!(store.find_all().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let patch = TodoPatch { title: None, completed: Some(true) };
        let err = store.update_by_id(id, patch).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn delete_missing_leaves_others() {
        let store = MemoryStore::new();
        store.insert(todo("keep me")).await.unwrap();

        let err = store.delete_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.insert(todo("walk dog")).await.unwrap();
        let patch = TodoPatch { title: None, completed: Some(true) };

        store.update_by_id(id, patch.clone()).await.unwrap();
        let once = store.find_all().await.unwrap();
        store.update_by_id(id, patch).await.unwrap();
        let twice = store.find_all().await.unwrap();

        assert_eq!(once, twice);
        assert!(twice[0].completed);
    }
}
