//! Account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IdentityId;

/// A registered account as seen by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
