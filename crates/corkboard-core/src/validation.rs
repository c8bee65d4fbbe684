//! Form checks run before any request is sent.
//!
//! These mirror the rules the board service enforces, so obviously bad
//! input is reported next to the offending field without a round trip.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{BoardDraft, SignUpForm};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Special characters a password must draw from.
const PASSWORD_SPECIALS: &str = "!%*#?&";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Form field an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Name,
    Password,
    ConfirmPassword,
    Title,
    Content,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter your name.")]
    MissingName,

    #[error("Password must be at least 8 characters and include a letter, a digit and one of !%*#?&.")]
    WeakPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter your email and password.")]
    MissingCredentials,

    #[error("Please enter a title and content.")]
    MissingTitleOrContent,
}

impl ValidationError {
    /// The field to show this error next to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::InvalidEmail | ValidationError::MissingCredentials => Field::Username,
            ValidationError::MissingName => Field::Name,
            ValidationError::WeakPassword => Field::Password,
            ValidationError::PasswordMismatch => Field::ConfirmPassword,
            ValidationError::MissingTitleOrContent => Field::Title,
        }
    }
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_PATTERN.is_match(s)
}

/// At least 8 characters from `A-Za-z0-9!%*#?&`, with at least one letter,
/// one digit and one special character.
pub fn is_valid_password(s: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);

    s.chars().count() >= MIN_PASSWORD_LENGTH
        && s.chars().all(allowed)
        && s.chars().any(|c| c.is_ascii_alphabetic())
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Check a sign-up form. The first failing rule is reported.
pub fn validate_sign_up(form: &SignUpForm) -> Result<(), ValidationError> {
    if !is_valid_email(&form.username) {
        return Err(ValidationError::InvalidEmail);
    }
    if form.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if !is_valid_password(&form.password) {
        return Err(ValidationError::WeakPassword);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_sign_in(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

pub fn validate_draft(draft: &BoardDraft) -> Result<(), ValidationError> {
    if draft.title.is_empty() || draft.content.is_empty() {
        return Err(ValidationError::MissingTitleOrContent);
    }
    Ok(())
}
