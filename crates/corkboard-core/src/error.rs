use thiserror::Error;

use crate::api::ApiError;
use crate::validation::ValidationError;

/// Failure of a board operation as seen by the user.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Not signed in")]
    NotSignedIn,
}

impl Error {
    /// Text to show for the failed action; `fallback` is used when neither
    /// the form check nor the server gave a specific reason.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            Error::Api(e) => e.user_message(fallback),
            Error::NotSignedIn => "Please sign in to continue.".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_by_kind() {
        let err = Error::from(ValidationError::WeakPassword);
        assert!(err.user_message("Sign-up failed").starts_with("Password must be"));

        let err = Error::from(ApiError::from_status(409, r#"{"message":"Email already registered"}"#));
        assert_eq!(err.user_message("Sign-up failed"), "Email already registered");

        let err = Error::from(ApiError::Transport("reset".into()));
        assert_eq!(err.user_message("Sign-up failed"), "Sign-up failed");

        assert!(Error::from(ApiError::from_status(404, "")).is_not_found());
        assert!(!Error::NotSignedIn.is_not_found());
    }
}
