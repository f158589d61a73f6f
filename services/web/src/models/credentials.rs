//! Registration form state

use std::fmt;

use serde::{Deserialize, Serialize};

/// A registration form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Username,
    Email,
    Password,
    RePassword,
}

impl Field {
    /// Every field, in form order
    pub const ALL: [Field; 4] = [
        Field::Username,
        Field::Email,
        Field::Password,
        Field::RePassword,
    ];

    /// Inline message shown while the field is invalid
    pub fn error_message(self) -> &'static str {
        match self {
            Field::Username => "Username should be between 3 and 15 characters long!",
            Field::Email => "Please use a valid email!",
            Field::Password => "Password should be between 6 and 50 characters long!",
            Field::RePassword => "Passwords should match!",
        }
    }
}

/// In-progress, unsubmitted registration values
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
}

impl CredentialDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::RePassword => &self.re_password,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Username => self.username = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::RePassword => self.re_password = value,
        }
    }
}

impl fmt::Debug for CredentialDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialDraft")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("re_password", &"<redacted>")
            .finish()
    }
}

/// Validation state of one field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldState {
    /// Edited (or never touched) since the last blur
    #[default]
    Unvalidated,
    Valid,
    Invalid,
}

impl FieldState {
    pub fn from_invalid(invalid: bool) -> Self {
        if invalid {
            FieldState::Invalid
        } else {
            FieldState::Valid
        }
    }

    pub fn is_invalid(self) -> bool {
        self == FieldState::Invalid
    }
}

/// Per-field validation flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationState {
    pub username: FieldState,
    pub email: FieldState,
    pub password: FieldState,
    pub re_password: FieldState,
    /// Set when the directory reported the username as taken
    pub unique_username: bool,
}

impl ValidationState {
    pub fn state(&self, field: Field) -> FieldState {
        match field {
            Field::Username => self.username,
            Field::Email => self.email,
            Field::Password => self.password,
            Field::RePassword => self.re_password,
        }
    }

    pub fn set(&mut self, field: Field, state: FieldState) {
        match field {
            Field::Username => self.username = state,
            Field::Email => self.email = state,
            Field::Password => self.password = state,
            Field::RePassword => self.re_password = state,
        }
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.state(field).is_invalid()
    }

    /// Fields currently flagged invalid, in form order
    pub fn invalid_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.is_invalid(*field))
            .collect()
    }
}

/// Conflicts reported by the backend after a submit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConflicts {
    pub username_not_unique: bool,
    pub email_taken: bool,
}

impl AuthConflicts {
    pub const EMAIL_TAKEN_MESSAGE: &'static str = "Email is already taken!";
    pub const USERNAME_TAKEN_MESSAGE: &'static str = "Username is already taken!";

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.username_not_unique || self.email_taken
    }

    /// Messages for the active conflicts
    pub fn messages(&self) -> Vec<&'static str> {
        let mut messages = Vec::new();
        if self.email_taken {
            messages.push(Self::EMAIL_TAKEN_MESSAGE);
        }
        if self.username_not_unique {
            messages.push(Self::USERNAME_TAKEN_MESSAGE);
        }
        messages
    }
}
