//! Like records and the view derived from them

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::IdentityId;

/// Identities that like one content item. Presence is membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeRecord {
    identities: BTreeSet<IdentityId>,
}

impl LikeRecord {
    /// Build a record from a stored `likes/{itemId}` node. Keys are the
    /// identities; entries whose value is `false` or `null` are not likes.
    pub fn from_snapshot(snapshot: Option<&Value>) -> Self {
        let identities = snapshot
            .and_then(Value::as_object)
            .map(|node| {
                node.iter()
                    .filter(|(_, value)| !matches!(value, Value::Bool(false) | Value::Null))
                    .map(|(id, _)| IdentityId::new(id.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self { identities }
    }

    pub fn contains(&self, id: &IdentityId) -> bool {
        self.identities.contains(id)
    }

    /// The view a given viewer sees
    pub fn view_for(&self, viewer: &IdentityId) -> LikeView {
        LikeView {
            status: self.contains(viewer),
            list: self
                .identities
                .iter()
                .cloned()
                .map(|id| LikeEntry { id })
                .collect(),
        }
    }
}

/// One materialised like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEntry {
    #[serde(rename = "_id")]
    pub id: IdentityId,
}

/// What the UI renders for an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeView {
    /// Whether the viewer likes the item
    pub status: bool,
    pub list: Vec<LikeEntry>,
}
