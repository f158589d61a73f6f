//! Session context handed to the rendering layer

use serde::Serialize;

use super::IdentityId;

/// Who is signed in for the current render or request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub current_user: Option<IdentityId>,
}

impl SessionContext {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn signed_in(id: IdentityId) -> Self {
        Self {
            current_user: Some(id),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}
