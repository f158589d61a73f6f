//! Registration input validation
//!
//! Lengths are counted in characters, not bytes.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{CredentialDraft, Field};

const USERNAME_LENGTH: (usize, usize) = (3, 15);
const PASSWORD_LENGTH: (usize, usize) = (6, 50);
/// Submit gate for the repeated password; equality is checked on submit.
const RE_PASSWORD_LENGTH: (usize, usize) = (5, 51);

fn length_within(value: &str, (min, max): (usize, usize)) -> bool {
    let length = value.chars().count();
    length >= min && length <= max
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("Failed to compile email regex"))
}

/// Whether the email has the `x@y.z` shape
pub fn email_matches(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Blur validator for the username
pub fn username_invalid(username: &str) -> bool {
    !length_within(username, USERNAME_LENGTH)
}

/// Blur validator for the email
pub fn email_invalid(email: &str) -> bool {
    !email_matches(email)
}

/// Blur validator for the password
pub fn password_invalid(password: &str) -> bool {
    !length_within(password, PASSWORD_LENGTH)
}

/// Blur validator for the repeated password
pub fn re_password_invalid(password: &str, re_password: &str) -> bool {
    password != re_password
}

/// Run the blur validator of `field` against the draft
pub fn field_invalid(field: Field, draft: &CredentialDraft) -> bool {
    match field {
        Field::Username => username_invalid(&draft.username),
        Field::Email => email_invalid(&draft.email),
        Field::Password => password_invalid(&draft.password),
        Field::RePassword => re_password_invalid(&draft.password, &draft.re_password),
    }
}

/// Whether the submit button is enabled for the draft
pub fn form_valid(draft: &CredentialDraft) -> bool {
    length_within(&draft.username, USERNAME_LENGTH)
        && email_matches(&draft.email)
        && length_within(&draft.password, PASSWORD_LENGTH)
        && length_within(&draft.re_password, RE_PASSWORD_LENGTH)
}
