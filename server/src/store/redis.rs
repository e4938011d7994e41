//! Redis-backed document store.
//!
//! Each todo is a hash at `{database}:{collection}:{id}` holding `title`,
//! `completed` and `created`. The collection itself is a set of member ids at
//! `{database}:{collection}`, which gives `find_all` something to enumerate
//! without scanning the keyspace.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use redis::aio::MultiplexedConnection;
use redis::{Client, Script};
use todo_core::{PersistedTodo, TodoPatch};
use tracing::{debug, info};
use uuid::Uuid;

use super::{StoreError, TodoStore};
use crate::config::StoreConfig;

const FIELD_TITLE: &str = "title";
const FIELD_COMPLETED: &str = "completed";
const FIELD_CREATED: &str = "created";

// Sets the supplied field/value pairs only if the document exists.
const UPDATE_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
if #ARGV > 0 then
    redis.call('HSET', KEYS[1], unpack(ARGV))
end
return 1
";

// Reads the member set and every member's hash in one server-side step, so
// the listing is a consistent snapshot. Replies `{id, {field, value, ...}}`
// per member.
const FIND_ALL_SCRIPT: &str = r"
local out = {}
for _, id in ipairs(redis.call('SMEMBERS', KEYS[1])) do
    out[#out + 1] = {id, redis.call('HGETALL', ARGV[1] .. id)}
end
return out
";

#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    namespace: String,
    update_script: Arc<Script>,
    find_all_script: Arc<Script>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Open a connection to the store and verify it answers a PING.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.url.as_str())?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;

        let namespace = format!("{}:{}", config.database, config.collection);
        info!(url = %config.url, collection = %namespace, "connected to document store");
        Ok(Self {
            conn,
            namespace,
            update_script: Arc::new(Script::new(UPDATE_SCRIPT)),
            find_all_script: Arc::new(Script::new(FIND_ALL_SCRIPT)),
        })
    }

    fn document_key(&self, id: &str) -> String {
        format!("{}:{}", self.namespace, id)
    }
}

impl TodoStore for RedisStore {
    async fn insert(&self, todo: PersistedTodo) -> Result<Uuid, StoreError> {
        let mut conn = self.conn.clone();
        let id = todo.id.to_string();
        redis::pipe()
            .atomic()
            .hset_multiple(self.document_key(&id), &encode(&todo)[..])
            .ignore()
            .sadd(&self.namespace, &id)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!(%id, "inserted todo");
        Ok(todo.id)
    }

    async fn find_all(&self) -> Result<Vec<PersistedTodo>, StoreError> {
        let mut conn = self.conn.clone();
        let documents: Vec<(String, HashMap<String, String>)> = self
            .find_all_script
            .key(&self.namespace)
            .arg(self.document_key(""))
            .invoke_async(&mut conn)
            .await?;

        documents
            .into_iter()
            .map(|(id, fields)| decode(&self.document_key(&id), &id, fields))
            .collect()
    }

    async fn update_by_id(&self, id: Uuid, patch: TodoPatch) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let mut invocation = self.update_script.prepare_invoke();
        invocation.key(self.document_key(&id.to_string()));
        if let Some(title) = &patch.title {
            invocation.arg(FIELD_TITLE).arg(title);
        }
        if let Some(completed) = patch.completed {
            invocation.arg(FIELD_COMPLETED).arg(completed.to_string());
        }

        let updated: i64 = invocation.invoke_async(&mut conn).await?;
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(%id, "updated todo");
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let member = id.to_string();
        let (removed, _): (usize, usize) = redis::pipe()
            .atomic()
            .del(self.document_key(&member))
            .srem(&self.namespace, &member)
            .query_async(&mut conn)
            .await?;
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(%id, "deleted todo");
        Ok(())
    }
}

fn encode(todo: &PersistedTodo) -> Vec<(&'static str, String)> {
    vec![
        (FIELD_TITLE, todo.title.clone()),
        (FIELD_COMPLETED, todo.completed.to_string()),
        (
            FIELD_CREATED,
            todo.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
    ]
}

fn decode(
    key: &str,
    id: &str,
    mut fields: HashMap<String, String>,
) -> Result<PersistedTodo, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        key: key.to_string(),
        reason,
    };
    let mut take = |field: &str| {
        fields
            .remove(field)
            .ok_or_else(|| corrupt(format!("missing field {field}")))
    };

    let title = take(FIELD_TITLE)?;
    let completed = take(FIELD_COMPLETED)?;
    let created = take(FIELD_CREATED)?;

    Ok(PersistedTodo {
        id: Uuid::parse_str(id).map_err(|e| corrupt(format!("bad id: {e}")))?,
        title,
        completed: completed
            .parse::<bool>()
            .map_err(|e| corrupt(format!("bad completed flag {completed:?}: {e}")))?,
        created_at: DateTime::parse_from_rfc3339(&created)
            .map_err(|e| corrupt(format!("bad timestamp {created:?}: {e}")))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedTodo {
        PersistedTodo {
            id: Uuid::new_v4(),
            title: "buy milk".to_string(),
            completed: true,
            created_at: "2024-05-01T12:30:00.123456789Z".parse().unwrap(),
        }
    }

    fn fields_of(todo: &PersistedTodo) -> HashMap<String, String> {
        encode(todo)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn encoded_document_decodes_to_same_todo() {
        let todo = sample();
        let decoded = decode("demo_todo:todo:x", &todo.id.to_string(), fields_of(&todo)).unwrap();
        assert_eq!(decoded, todo);
    }

    #[test]
    fn encode_uses_plain_field_values() {
        let fields = fields_of(&sample());
        assert_eq!(fields["completed"], "true");
        assert_eq!(fields["created"], "2024-05-01T12:30:00.123456789Z");
    }

    #[test]
    fn decode_reports_missing_field() {
        let todo = sample();
        let mut fields = fields_of(&todo);
        fields.remove("title");
        let err = decode("k", &todo.id.to_string(), fields).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref reason, .. } if reason.contains("title")));
    }

    #[test]
    fn decode_rejects_bad_values() {
        let todo = sample();

        let mut fields = fields_of(&todo);
        fields.insert("completed".to_string(), "yes".to_string());
        assert!(decode("k", &todo.id.to_string(), fields).is_err());

        let mut fields = fields_of(&todo);
        fields.insert("created".to_string(), "yesterday".to_string());
        assert!(decode("k", &todo.id.to_string(), fields).is_err());

        assert!(decode("k", "not-a-uuid", fields_of(&todo)).is_err());
    }
}
