//! Redis backed realtime store
//!
//! Every node keeps its direct children in one Redis hash keyed
//! `{prefix}:{path}`, with JSON encoded field values. Child values must be
//! leaves: writing a non-empty object through `update` is rejected, since
//! its children could not be addressed by later `get`/`remove` calls.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::{RealtimeStore, StorePath, validate_segment};

/// Configuration for the Redis store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Prefix for every key written by the store
    pub key_prefix: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    /// - `REDIS_KEY_PREFIX`: Key prefix (default: "bloggy")
    pub fn from_env() -> StoreResult<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let key_prefix =
            std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "bloggy".to_string());

        if key_prefix.is_empty() {
            return Err(StoreError::Configuration(
                "REDIS_KEY_PREFIX must not be empty".to_string(),
            ));
        }

        Ok(RedisConfig { url, key_prefix })
    }
}

/// Realtime store on top of Redis hashes
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    key_prefix: String,
}

impl RedisStore {
    /// Create a new Redis store
    pub fn new(config: &RedisConfig) -> StoreResult<Self> {
        let client = Client::open(config.url.clone())?;
        info!("Redis store initialized with URL: {}", config.url);
        Ok(RedisStore {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    async fn get_connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    fn node_key(&self, path: &StorePath) -> String {
        format!("{}:{}", self.key_prefix, path)
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> StoreResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

fn root_unsupported() -> StoreError {
    StoreError::InvalidPath("the Redis store does not address the root".to_string())
}

#[async_trait]
impl RealtimeStore for RedisStore {
    async fn get(&self, path: &StorePath) -> StoreResult<Option<Value>> {
        let Some((parent, last)) = path.split_last() else {
            return Err(root_unsupported());
        };
        let mut conn = self.get_connection().await?;

        let fields: HashMap<String, String> = conn.hgetall(self.node_key(path)).await?;
        if !fields.is_empty() {
            let mut node = Map::new();
            for (key, raw) in fields {
                node.insert(key, serde_json::from_str(&raw)?);
            }
            return Ok(Some(Value::Object(node)));
        }

        if parent.is_root() {
            return Ok(None);
        }

        let raw: Option<String> = conn.hget(self.node_key(&parent), last).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, path: &StorePath, children: Map<String, Value>) -> StoreResult<()> {
        if path.is_root() {
            return Err(root_unsupported());
        }
        for key in children.keys() {
            validate_segment(key)?;
        }
        if children.is_empty() {
            return Ok(());
        }

        debug!("Updating {} child(ren) at '{}'", children.len(), path);

        let key = self.node_key(path);
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (field, value) in children {
            match value {
                Value::Null => {
                    pipe.hdel(&key, field).ignore();
                }
                Value::Object(ref map) if map.is_empty() => {
                    pipe.hdel(&key, field).ignore();
                }
                Value::Object(_) => {
                    return Err(StoreError::Unsupported(format!(
                        "nested object under '{}/{}'; write it at its own path",
                        path, field
                    )));
                }
                value => {
                    pipe.hset(&key, field, serde_json::to_string(&value)?).ignore();
                }
            }
        }

        let mut conn = self.get_connection().await?;
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        let Some((parent, last)) = path.split_last() else {
            return Err(root_unsupported());
        };

        debug!("Removing '{}'", path);

        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.del(self.node_key(path)).ignore();
        if !parent.is_root() {
            pipe.hdel(self.node_key(&parent), last).ignore();
        }

        let mut conn = self.get_connection().await?;
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_redis_config_from_env_defaults() {
        unsafe {
            std::env::remove_var("REDIS_URL");
            std::env::remove_var("REDIS_KEY_PREFIX");
        }

        let config = RedisConfig::from_env().unwrap();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.key_prefix, "bloggy");
    }

    #[test]
    #[serial]
    fn test_redis_config_rejects_empty_prefix() {
        unsafe {
            std::env::set_var("REDIS_KEY_PREFIX", "");
        }

        let result = RedisConfig::from_env();
        assert!(matches!(result, Err(StoreError::Configuration(_))));

        unsafe {
            std::env::remove_var("REDIS_KEY_PREFIX");
        }
    }

    #[test]
    fn test_node_key_uses_prefix() {
        let store = RedisStore::new(&RedisConfig {
            url: "redis://localhost:6379".to_string(),
            key_prefix: "test".to_string(),
        })
        .unwrap();

        let path = StorePath::parse("likes/post-1").unwrap();
        assert_eq!(store.node_key(&path), "test:likes/post-1");
    }

    #[tokio::test]
    async fn test_update_rejects_nested_objects_before_connecting() {
        // Nothing listens on this port; the value is refused before any I/O.
        let store = RedisStore::new(&RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            key_prefix: "test".to_string(),
        })
        .unwrap();

        let mut children = Map::new();
        children.insert("post-1".to_string(), serde_json::json!({ "alice": true }));

        let result = store
            .update(&StorePath::parse("likes").unwrap(), children)
            .await;
        assert!(matches!(result, Err(StoreError::Unsupported(_))));
    }
}
