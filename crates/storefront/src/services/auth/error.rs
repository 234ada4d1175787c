//! Authentication error types.

use orchard_core::EmailError;
use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password doesn't meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Email/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The OAuth state stored in the session doesn't match the callback.
    #[error("invalid session state")]
    InvalidSessionState,

    /// The auth provider rejected the request.
    #[error("auth provider error: {0}")]
    Provider(String),

    /// HTTP request to the auth provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
