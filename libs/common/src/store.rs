//! Path-addressed realtime store
//!
//! The store is a JSON tree. Nodes are addressed by slash separated paths
//! such as `likes/post-1/user-7`. Empty objects are never kept: removing the
//! last child of a node removes the node itself.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// A parsed store path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the tree
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path like `likes/post-1`. Leading and trailing slashes are
    /// ignored, empty segments in between are rejected.
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut path = Self::root();
        for segment in trimmed.split('/') {
            path = path.child(segment)?;
        }
        Ok(path)
    }

    /// Append one segment
    pub fn child(&self, segment: &str) -> StoreResult<Self> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the parent path and the last segment
    pub fn split_last(&self) -> Option<(StorePath, &str)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            StorePath {
                segments: parent.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Validate a single path segment or child key
pub fn validate_segment(segment: &str) -> StoreResult<()> {
    if segment.is_empty() {
        return Err(StoreError::InvalidPath("empty path segment".to_string()));
    }
    if segment.contains('/') {
        return Err(StoreError::InvalidPath(format!(
            "segment '{}' contains '/'",
            segment
        )));
    }
    Ok(())
}

/// Realtime document store
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Read the node at `path`, `None` when nothing is stored there
    async fn get(&self, path: &StorePath) -> StoreResult<Option<Value>>;

    /// Merge `children` into the node at `path`. A `null` child removes
    /// that child. Backends that only keep one level of children below a
    /// node reject non-empty object values with [`StoreError::Unsupported`].
    async fn update(&self, path: &StorePath, children: Map<String, Value>) -> StoreResult<()>;

    /// Delete the node at `path`. Deleting an absent node is a no-op.
    async fn remove(&self, path: &StorePath) -> StoreResult<()>;
}

/// In-process realtime store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    root: Arc<Mutex<Map<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    async fn get(&self, path: &StorePath) -> StoreResult<Option<Value>> {
        let root = self.root.lock().await;

        if path.is_root() {
            if root.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Value::Object(root.clone())));
        }

        Ok(lookup(&root, path.segments()).cloned())
    }

    async fn update(&self, path: &StorePath, children: Map<String, Value>) -> StoreResult<()> {
        for key in children.keys() {
            validate_segment(key)?;
        }
        if children.is_empty() {
            return Ok(());
        }

        debug!("Updating {} child(ren) at '{}'", children.len(), path);

        let mut root = self.root.lock().await;
        let node = node_mut(&mut root, path.segments());
        for (key, value) in children {
            if is_empty_value(&value) {
                node.remove(&key);
            } else {
                node.insert(key, value);
            }
        }
        prune(&mut root, path.segments());

        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        debug!("Removing '{}'", path);

        let mut root = self.root.lock().await;
        let Some((parent, last)) = path.split_last() else {
            root.clear();
            return Ok(());
        };

        if parent.is_root() {
            root.remove(last);
            return Ok(());
        }

        if let Some(Value::Object(node)) = lookup_mut(&mut root, parent.segments()) {
            node.remove(last);
        }
        prune(&mut root, parent.segments());

        Ok(())
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut node = root.get(first)?;
    for segment in rest {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

fn lookup_mut<'a>(root: &'a mut Map<String, Value>, segments: &[String]) -> Option<&'a mut Value> {
    let (first, rest) = segments.split_first()?;
    let mut node = root.get_mut(first)?;
    for segment in rest {
        node = node.as_object_mut()?.get_mut(segment)?;
    }
    Some(node)
}

/// Walk to the object at `segments`, creating objects along the way and
/// replacing scalars that sit where an object is needed.
fn node_mut<'a>(root: &'a mut Map<String, Value>, segments: &[String]) -> &'a mut Map<String, Value> {
    let mut node = root;
    for segment in segments {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(map) = entry else {
            unreachable!("entry was just made an object");
        };
        node = map;
    }
    node
}

/// Drop empty objects along `segments`, deepest first
fn prune(map: &mut Map<String, Value>, segments: &[String]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if let Some(Value::Object(child)) = map.get_mut(first) {
        prune(child, rest);
        if child.is_empty() {
            map.remove(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> StorePath {
        StorePath::parse(raw).unwrap()
    }

    fn children(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_parse_path() {
        let parsed = path("/likes/post-1/");
        assert_eq!(parsed.segments(), &["likes".to_string(), "post-1".to_string()]);
        assert_eq!(parsed.to_string(), "likes/post-1");
        assert!(path("").is_root());
    }

    #[test]
    fn test_parse_rejects_empty_segment() {
        let err = StorePath::parse("likes//post-1").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
        assert!(path("likes").child("a/b").is_err());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() -> StoreResult<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get(&path("likes/post-1")).await?, None);
        assert_eq!(store.get(&StorePath::root()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_merges_children() -> StoreResult<()> {
        let store = MemoryStore::new();
        let post = path("likes/post-1");

        store.update(&post, children(json!({ "alice": true }))).await?;
        store.update(&post, children(json!({ "bob": true }))).await?;

        assert_eq!(
            store.get(&post).await?,
            Some(json!({ "alice": true, "bob": true }))
        );
        assert_eq!(store.get(&path("likes/post-1/bob")).await?, Some(json!(true)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_null_removes_child() -> StoreResult<()> {
        let store = MemoryStore::new();
        let post = path("likes/post-1");

        store
            .update(&post, children(json!({ "alice": true, "bob": true })))
            .await?;
        store.update(&post, children(json!({ "alice": null }))).await?;

        assert_eq!(store.get(&post).await?, Some(json!({ "bob": true })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_slash_in_key() {
        let store = MemoryStore::new();
        let result = store
            .update(&path("likes"), children(json!({ "a/b": true })))
            .await;
        assert!(matches!(result, Err(StoreError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_remove_last_child_prunes_parents() -> StoreResult<()> {
        let store = MemoryStore::new();
        let post = path("likes/post-1");

        store.update(&post, children(json!({ "alice": true }))).await?;
        store.remove(&path("likes/post-1/alice")).await?;

        assert_eq!(store.get(&post).await?, None);
        assert_eq!(store.get(&path("likes")).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() -> StoreResult<()> {
        let store = MemoryStore::new();
        store
            .update(&path("likes/post-1"), children(json!({ "alice": true })))
            .await?;

        store.remove(&path("likes/post-1/bob")).await?;
        store.remove(&path("likes/post-2/bob")).await?;

        assert_eq!(
            store.get(&path("likes/post-1")).await?,
            Some(json!({ "alice": true }))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_scalar_with_object() -> StoreResult<()> {
        let store = MemoryStore::new();
        store
            .update(&path("likes"), children(json!({ "post-1": true })))
            .await?;
        store
            .update(&path("likes/post-1"), children(json!({ "alice": true })))
            .await?;

        assert_eq!(
            store.get(&path("likes")).await?,
            Some(json!({ "post-1": { "alice": true } }))
        );
        Ok(())
    }
}
