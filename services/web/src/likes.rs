//! Like ledger
//!
//! Likes live in the realtime store under `likes/{itemId}/{identityId}` with
//! the value `true`. Each identity only ever writes its own key, so likes
//! from different identities never conflict.

use std::sync::Arc;

use common::{RealtimeStore, StorePath, StoreResult};
use serde_json::{Map, Value};
use tracing::info;

use crate::models::{IdentityId, ItemId, LikeRecord, LikeView};

const LIKES_ROOT: &str = "likes";

/// Like/dislike operations over a realtime store
#[derive(Clone)]
pub struct LikeLedger {
    store: Arc<dyn RealtimeStore>,
}

impl LikeLedger {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        Self { store }
    }

    fn item_path(item: &ItemId) -> StoreResult<StorePath> {
        StorePath::root().child(LIKES_ROOT)?.child(item.as_str())
    }

    /// Read the like record of an item
    pub async fn record(&self, item: &ItemId) -> StoreResult<LikeRecord> {
        let snapshot = self.store.get(&Self::item_path(item)?).await?;
        Ok(LikeRecord::from_snapshot(snapshot.as_ref()))
    }

    /// The likes of an item and whether `viewer` is among them
    pub async fn get_likes(&self, viewer: &IdentityId, item: &ItemId) -> StoreResult<LikeView> {
        Ok(self.record(item).await?.view_for(viewer))
    }

    /// Mark `viewer` as liking the item. Repeating it changes nothing.
    pub async fn like(&self, viewer: &IdentityId, item: &ItemId) -> StoreResult<()> {
        info!("Identity {} likes item {}", viewer, item);

        let mut children = Map::new();
        children.insert(viewer.as_str().to_string(), Value::Bool(true));
        self.store.update(&Self::item_path(item)?, children).await
    }

    /// Remove the like of `viewer`. Absent likes are a no-op.
    pub async fn dislike(&self, viewer: &IdentityId, item: &ItemId) -> StoreResult<()> {
        info!("Identity {} dislikes item {}", viewer, item);

        let path = Self::item_path(item)?.child(viewer.as_str())?;
        self.store.remove(&path).await
    }

    /// Like when not liked yet, otherwise dislike, then return the new view.
    ///
    /// The read and the write are separate store calls, so two toggles racing
    /// for the same identity may both like (or both dislike).
    pub async fn toggle(&self, viewer: &IdentityId, item: &ItemId) -> StoreResult<LikeView> {
        if self.record(item).await?.contains(viewer) {
            self.dislike(viewer, item).await?;
        } else {
            self.like(viewer, item).await?;
        }
        self.get_likes(viewer, item).await
    }
}
