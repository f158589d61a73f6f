//! Authentication provider and user directory
//!
//! The blog talks to its account backend through [`AuthProvider`] and
//! [`UserDirectory`]. [`InMemoryAccounts`] implements both inside the
//! process. The provider keeps no signed-in slot: callers carry the
//! returned [`Account`] in their own session context.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{Account, IdentityId};

/// Registration failure reported by the provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("auth failure: {code}")]
pub struct AuthFailure {
    pub code: String,
}

impl AuthFailure {
    pub const EMAIL_ALREADY_IN_USE: &'static str = "auth/email-already-in-use";
    pub const WEAK_PASSWORD: &'static str = "auth/weak-password";
    pub const INVALID_CREDENTIAL: &'static str = "auth/invalid-credential";
    pub const INTERNAL: &'static str = "auth/internal-error";

    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn is_email_already_in_use(&self) -> bool {
        self.code == Self::EMAIL_ALREADY_IN_USE
    }
}

/// Account creation and sign-in
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthFailure>;

    /// Check credentials and return the matching account
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthFailure>;
}

/// Username lookups
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn is_username_unique(&self, username: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Debug, Default)]
struct AccountTable {
    by_id: HashMap<IdentityId, StoredAccount>,
}

/// Accounts kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccounts {
    inner: Arc<Mutex<AccountTable>>,
}

const MIN_PROVIDER_PASSWORD_LENGTH: usize = 6;

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check a password against a stored hash
fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn hash_password(password: &str) -> Result<String, AuthFailure> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AuthFailure::new(AuthFailure::INTERNAL)
        })
}

#[async_trait]
impl AuthProvider for InMemoryAccounts {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthFailure> {
        info!("Registering account for user: {}", username);

        if password.chars().count() < MIN_PROVIDER_PASSWORD_LENGTH {
            return Err(AuthFailure::new(AuthFailure::WEAK_PASSWORD));
        }

        let password_hash = hash_password(password)?;

        let mut table = self.inner.lock().await;
        let email_taken = table
            .by_id
            .values()
            .any(|stored| stored.account.email.eq_ignore_ascii_case(email));
        if email_taken {
            return Err(AuthFailure::new(AuthFailure::EMAIL_ALREADY_IN_USE));
        }

        let account = Account {
            id: IdentityId::new(uuid::Uuid::new_v4().to_string()),
            username: username.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        table.by_id.insert(
            account.id.clone(),
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );

        info!("Registered account {} for user: {}", account.id, username);
        Ok(account)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthFailure> {
        info!("Sign-in attempt for email: {}", email);

        let stored = {
            let table = self.inner.lock().await;
            table
                .by_id
                .values()
                .find(|stored| stored.account.email.eq_ignore_ascii_case(email))
                .cloned()
        };
        let Some(stored) = stored else {
            return Err(AuthFailure::new(AuthFailure::INVALID_CREDENTIAL));
        };

        match verify_password(&stored.password_hash, password) {
            Ok(true) => Ok(stored.account),
            Ok(false) => Err(AuthFailure::new(AuthFailure::INVALID_CREDENTIAL)),
            Err(e) => {
                tracing::error!("Failed to verify password: {}", e);
                Err(AuthFailure::new(AuthFailure::INTERNAL))
            }
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryAccounts {
    async fn is_username_unique(&self, username: &str) -> Result<bool> {
        let table = self.inner.lock().await;
        Ok(!table
            .by_id
            .values()
            .any(|stored| stored.account.username == username))
    }
}
