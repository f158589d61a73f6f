//! Registration form controller
//!
//! Holds the credential draft and its validation state, reacts to change,
//! blur and submit events, and decides where the client goes after a
//! submit.

use tracing::{error, info, warn};

use crate::auth::{AuthProvider, UserDirectory};
use crate::models::{Account, AuthConflicts, CredentialDraft, Field, FieldState, ValidationState};
use crate::navigation::{Navigator, Route};
use crate::validation;

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The account was created; the client goes home
    Registered(Account),
    /// Leave the form for another route
    Navigate(Route),
    /// Stay on the form; validation or conflict flags explain why
    Stay,
}

impl SubmitOutcome {
    /// Route the client moves to, if any
    pub fn route(&self) -> Option<Route> {
        match self {
            SubmitOutcome::Registered(_) => Some(Route::Home),
            SubmitOutcome::Navigate(route) => Some(*route),
            SubmitOutcome::Stay => None,
        }
    }
}

/// State of one registration form
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    draft: CredentialDraft,
    validation: ValidationState,
    conflicts: AuthConflicts,
    form_valid: bool,
}

impl RegistrationForm {
    /// Empty form, as mounted
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn conflicts(&self) -> &AuthConflicts {
        &self.conflicts
    }

    /// Whether the submit button is enabled
    pub fn form_valid(&self) -> bool {
        self.form_valid
    }

    /// Input changed. The edited field goes back to unvalidated and the
    /// submit gate is recomputed from the updated draft.
    pub fn on_change(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value.into());
        self.validation.set(field, FieldState::Unvalidated);
        if field == Field::Username {
            self.validation.unique_username = false;
        }
        self.conflicts.clear();
        self.form_valid = validation::form_valid(&self.draft);
    }

    /// Input lost focus; run its validator against the current draft
    pub fn on_blur(&mut self, field: Field) {
        let invalid = validation::field_invalid(field, &self.draft);
        self.validation.set(field, FieldState::from_invalid(invalid));
    }

    /// Inline messages currently shown, field messages first
    pub fn messages(&self) -> Vec<&'static str> {
        let mut messages: Vec<&'static str> = self
            .validation
            .invalid_fields()
            .into_iter()
            .map(Field::error_message)
            .collect();
        messages.extend(self.conflicts.messages());
        messages
    }

    /// Submit the form.
    ///
    /// A password mismatch stops before any backend call. Otherwise the
    /// username is checked for uniqueness and the account is created.
    /// Backend failures other than a taken email are logged and send the
    /// client to the not-found view.
    pub async fn submit<D, A>(&mut self, directory: &D, provider: &A) -> SubmitOutcome
    where
        D: UserDirectory + ?Sized,
        A: AuthProvider + ?Sized,
    {
        if self.draft.password != self.draft.re_password {
            self.validation.set(Field::RePassword, FieldState::Invalid);
            return SubmitOutcome::Stay;
        }

        let username = self.draft.username.clone();
        info!("Registration submitted for user: {}", username);

        match directory.is_username_unique(&username).await {
            Ok(true) => {}
            Ok(false) => {
                info!("Username already taken: {}", username);
                self.conflicts.username_not_unique = true;
                self.validation.unique_username = true;
                return SubmitOutcome::Stay;
            }
            Err(e) => {
                error!("Username uniqueness check failed: {}", e);
                return SubmitOutcome::Navigate(Route::NotFound);
            }
        }

        match provider
            .register(&username, &self.draft.email, &self.draft.password)
            .await
        {
            Ok(account) => {
                info!("Registered user {} as {}", username, account.id);
                *self = Self::new();
                SubmitOutcome::Registered(account)
            }
            Err(failure) if failure.is_email_already_in_use() => {
                info!("Email already in use for user: {}", username);
                self.conflicts.email_taken = true;
                SubmitOutcome::Stay
            }
            Err(failure) => {
                warn!("Registration failed with code {}", failure.code);
                SubmitOutcome::Navigate(Route::NotFound)
            }
        }
    }

    /// Submit and hand any navigation to `navigator`
    pub async fn submit_with<D, A, N>(
        &mut self,
        directory: &D,
        provider: &A,
        navigator: &mut N,
    ) -> SubmitOutcome
    where
        D: UserDirectory + ?Sized,
        A: AuthProvider + ?Sized,
        N: Navigator + ?Sized,
    {
        let outcome = self.submit(directory, provider).await;
        if let Some(route) = outcome.route() {
            navigator.navigate(route);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthFailure, InMemoryAccounts};
    use crate::models::IdentityId;
    use crate::navigation::RecordingNavigator;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend with canned answers that counts calls
    struct ScriptedBackend {
        unique: anyhow::Result<bool>,
        failure: Option<AuthFailure>,
        directory_calls: AtomicUsize,
        register_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(unique: bool, failure: Option<&str>) -> Self {
            Self {
                unique: Ok(unique),
                failure: failure.map(AuthFailure::new),
                directory_calls: AtomicUsize::new(0),
                register_calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.directory_calls.load(Ordering::SeqCst),
                self.register_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl UserDirectory for ScriptedBackend {
        async fn is_username_unique(&self, _username: &str) -> anyhow::Result<bool> {
            self.directory_calls.fetch_add(1, Ordering::SeqCst);
            match &self.unique {
                Ok(unique) => Ok(*unique),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for ScriptedBackend {
        async fn register(
            &self,
            username: &str,
            email: &str,
            _password: &str,
        ) -> Result<Account, AuthFailure> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(Account {
                    id: IdentityId::new("new-account"),
                    username: username.to_string(),
                    email: email.to_string(),
                    created_at: chrono::Utc::now(),
                }),
            }
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<Account, AuthFailure> {
            Err(AuthFailure::new(AuthFailure::INVALID_CREDENTIAL))
        }
    }

    fn filled(password: &str, re_password: &str) -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.on_change(Field::Username, "john");
        form.on_change(Field::Email, "john@email.com");
        form.on_change(Field::Password, password);
        form.on_change(Field::RePassword, re_password);
        form
    }

    #[test]
    fn test_new_form_is_empty_and_disabled() {
        let form = RegistrationForm::new();
        assert_eq!(&form.draft, &CredentialDraft::default());
        assert!(!form.form_valid());
        assert!(form.messages().is_empty());
    }

    #[test]
    fn test_form_valid_uses_just_typed_value() {
        let mut form = RegistrationForm::new();
        form.on_change(Field::Username, "john");
        form.on_change(Field::Email, "john@email.com");
        form.on_change(Field::Password, "secret1");
        assert!(!form.form_valid());

        form.on_change(Field::RePassword, "secret1");
        assert!(form.form_valid());

        form.on_change(Field::Username, "jo");
        assert!(!form.form_valid());
    }

    #[test]
    fn test_blur_marks_field_and_change_clears_it() {
        let mut form = RegistrationForm::new();
        form.on_change(Field::Username, "ab");
        assert_eq!(form.validation().username, FieldState::Unvalidated);

        form.on_blur(Field::Username);
        assert!(form.validation().is_invalid(Field::Username));
        assert_eq!(
            form.messages(),
            vec!["Username should be between 3 and 15 characters long!"]
        );

        form.on_change(Field::Username, "abc");
        assert_eq!(form.validation().username, FieldState::Unvalidated);

        form.on_blur(Field::Username);
        assert_eq!(form.validation().username, FieldState::Valid);
    }

    #[test]
    fn test_re_password_blur_compares_with_password() {
        let mut form = filled("secret1", "secret2");
        form.on_blur(Field::RePassword);
        assert!(form.validation().is_invalid(Field::RePassword));

        form.on_change(Field::RePassword, "secret1");
        form.on_blur(Field::RePassword);
        assert!(!form.validation().is_invalid(Field::RePassword));
    }

    #[tokio::test]
    async fn test_mismatched_passwords_never_call_backend() {
        let backend = ScriptedBackend::new(true, None);
        let mut form = filled("secret1", "secret2");

        let outcome = form.submit(&backend, &backend).await;

        assert_eq!(outcome, SubmitOutcome::Stay);
        assert!(form.validation().is_invalid(Field::RePassword));
        assert_eq!(backend.calls(), (0, 0));
    }

    #[tokio::test]
    async fn test_taken_username_stops_before_register() {
        let backend = ScriptedBackend::new(false, None);
        let mut form = filled("secret1", "secret1");

        let outcome = form.submit(&backend, &backend).await;

        assert_eq!(outcome, SubmitOutcome::Stay);
        assert!(form.conflicts().username_not_unique);
        assert!(form.validation().unique_username);
        assert_eq!(backend.calls(), (1, 0));
        assert!(form.messages().contains(&"Username is already taken!"));
    }

    #[tokio::test]
    async fn test_successful_register_navigates_home() {
        let backend = ScriptedBackend::new(true, None);
        let mut navigator = RecordingNavigator::default();
        let mut form = filled("secret1", "secret1");

        let outcome = form.submit_with(&backend, &backend, &mut navigator).await;

        match &outcome {
            SubmitOutcome::Registered(account) => {
                assert_eq!(account.username, "john");
                assert_eq!(account.email, "john@email.com");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(outcome.route(), Some(Route::Home));
        assert_eq!(navigator.last(), Some(Route::Home));
        assert_eq!(backend.calls(), (1, 1));
        assert_eq!(&form.draft, &CredentialDraft::default());
    }

    #[tokio::test]
    async fn test_taken_email_sets_conflict_without_navigation() {
        let backend = ScriptedBackend::new(true, Some(AuthFailure::EMAIL_ALREADY_IN_USE));
        let mut navigator = RecordingNavigator::default();
        let mut form = filled("secret1", "secret1");

        let outcome = form.submit_with(&backend, &backend, &mut navigator).await;

        assert_eq!(outcome, SubmitOutcome::Stay);
        assert!(form.conflicts().email_taken);
        assert!(navigator.visited.is_empty());
        assert_eq!(form.draft.username, "john");
    }

    #[tokio::test]
    async fn test_unexpected_failure_navigates_to_not_found() {
        let backend = ScriptedBackend::new(true, Some("auth/network-request-failed"));
        let mut form = filled("secret1", "secret1");

        let outcome = form.submit(&backend, &backend).await;

        assert_eq!(outcome, SubmitOutcome::Navigate(Route::NotFound));
        assert!(!form.conflicts().any());
    }

    #[tokio::test]
    async fn test_directory_error_navigates_to_not_found() {
        let mut backend = ScriptedBackend::new(true, None);
        backend.unique = Err(anyhow::anyhow!("directory unavailable"));
        let mut form = filled("secret1", "secret1");

        let outcome = form.submit(&backend, &backend).await;

        assert_eq!(outcome, SubmitOutcome::Navigate(Route::NotFound));
        assert_eq!(backend.calls(), (1, 0));
    }

    #[tokio::test]
    async fn test_change_clears_conflicts() {
        let backend = ScriptedBackend::new(true, Some(AuthFailure::EMAIL_ALREADY_IN_USE));
        let mut form = filled("secret1", "secret1");
        form.submit(&backend, &backend).await;
        assert!(form.conflicts().email_taken);

        form.on_change(Field::Email, "other@email.com");
        assert!(!form.conflicts().any());
    }

    #[tokio::test]
    async fn test_in_memory_accounts_end_to_end() {
        let accounts = InMemoryAccounts::new();

        let mut first = filled("secret1", "secret1");
        let outcome = first.submit(&accounts, &accounts).await;
        assert!(matches!(outcome, SubmitOutcome::Registered(_)));

        let mut second = filled("secret1", "secret1");
        assert_eq!(second.submit(&accounts, &accounts).await, SubmitOutcome::Stay);
        assert!(second.conflicts().username_not_unique);

        let mut third = filled("secret1", "secret1");
        third.on_change(Field::Username, "jane");
        assert_eq!(third.submit(&accounts, &accounts).await, SubmitOutcome::Stay);
        assert!(third.conflicts().email_taken);
    }
}
