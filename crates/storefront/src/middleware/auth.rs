//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in user in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::{AuthSession, session_keys};

/// Extractor that requires a signed-in user.
///
/// Returns 401 if no authentication state is present in the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(auth): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthSession);

/// Error returned when authentication is required but the user is not signed in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "Sign in required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let auth: AuthSession = session
            .get(session_keys::AUTH_SESSION)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        // TODO: refresh via AuthClient::refresh when the token is expired

        Ok(Self(auth))
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// signed in.
pub struct OptionalAuth(pub Option<AuthSession>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<AuthSession>(session_keys::AUTH_SESSION)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(auth))
    }
}

/// Helper to set the authentication state in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_session(
    session: &Session,
    auth: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_SESSION, auth).await
}

/// Helper to clear the authentication state from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_session(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthSession>(session_keys::AUTH_SESSION)
        .await?;
    Ok(())
}
