//! Blog client models

pub mod account;
pub mod credentials;
pub mod identity;
pub mod like;
pub mod session;

// Re-export for convenience
pub use account::Account;
pub use credentials::{AuthConflicts, CredentialDraft, Field, FieldState, ValidationState};
pub use identity::{IdentityId, ItemId};
pub use like::{LikeRecord, LikeView};
pub use session::SessionContext;
