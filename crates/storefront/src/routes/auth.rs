//! Authentication route handlers.
//!
//! Password sign-in/sign-up plus the provider's hosted OAuth flow:
//! - Login: Redirects to the provider's authorization page
//! - Callback: Validates state, exchanges the code for tokens
//! - Both paths end with the tokens and user stored in the session

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::auth::{clear_auth_session, set_auth_session};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{AuthSession, session_keys};
use crate::services::auth::{AuthError, AuthUser};
use crate::state::AppState;

/// Password sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Fetch the user for a fresh token and store both in the session.
async fn establish_session(
    state: &AppState,
    session: &Session,
    token: crate::services::auth::AuthToken,
) -> Result<AuthUser> {
    let user = state.auth().current_user(&token.access_token).await?;
    set_auth_session(session, &AuthSession {
        token,
        user: user.clone(),
    })
    .await?;
    Ok(user)
}

/// Password sign-in.
///
/// # Route
///
/// `POST /auth/sign-in`
#[instrument(skip(state, session, input))]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<SignInInput>,
) -> Result<Json<AuthUser>> {
    let token = state.auth().sign_in(&input.email, &input.password).await?;
    let user = establish_session(&state, &session, token).await?;

    tracing::info!(user_id = %user.id, "user signed in");
    Ok(Json(user))
}

/// Account registration.
///
/// # Route
///
/// `POST /auth/sign-up`
#[instrument(skip(state, session, input))]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<SignUpInput>,
) -> Result<(StatusCode, Json<AuthUser>)> {
    let token = state
        .auth()
        .sign_up(&input.email, &input.password, input.name.as_deref())
        .await?;
    let user = establish_session(&state, &session, token).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Sign out.
///
/// Revokes the provider session (failure is logged and otherwise ignored)
/// and clears the local authentication state.
///
/// # Route
///
/// `POST /auth/sign-out`
#[instrument(skip(state, session))]
pub async fn sign_out(State(state): State<AppState>, session: Session) -> Result<StatusCode> {
    if let Some(auth) = session
        .get::<AuthSession>(session_keys::AUTH_SESSION)
        .await?
        && let Err(e) = state.auth().sign_out(auth.bearer()).await
    {
        tracing::warn!("provider sign-out failed: {e}");
    }

    clear_auth_session(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current user, or `null` when signed out.
///
/// # Route
///
/// `GET /auth/me`
#[instrument(skip(auth))]
pub async fn me(OptionalAuth(auth): OptionalAuth) -> Json<Option<AuthUser>> {
    Json(auth.map(|a| a.user))
}

/// Initiate the hosted OAuth login.
///
/// Generates a state parameter, stores it in the session, and redirects to
/// the provider's authorization page.
///
/// # Route
///
/// `GET /auth/oauth/login`
#[instrument(skip(state, session))]
pub async fn oauth_login(State(state): State<AppState>, session: Session) -> Response {
    // Generate CSRF state
    let oauth_state = generate_random_string(32);

    // Store in session for validation on callback
    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {e}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    // Build the redirect URI
    let redirect_uri = format!("{}/auth/oauth/callback", state.config().base_url);

    // Generate and redirect to authorization URL
    let auth_url = state.auth().authorization_url(&redirect_uri, &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for
/// tokens, and stores the authentication state in the session.
///
/// # Route
///
/// `GET /auth/oauth/callback`
#[instrument(skip(state, session, query))]
pub async fn oauth_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect> {
    // Check for OAuth errors from the provider
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("OAuth error: {error} - {description}");
        return Err(AuthError::Provider(error).into());
    }

    // Verify we have an authorization code and state
    let code = query
        .code
        .ok_or_else(|| crate::error::AppError::BadRequest("missing code".to_string()))?;
    let returned_state = query
        .state
        .ok_or_else(|| crate::error::AppError::BadRequest("missing state".to_string()))?;

    // Verify state parameter (CSRF protection)
    let stored_state: Option<String> = session.get(session_keys::OAUTH_STATE).await?;
    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("OAuth state mismatch");
        return Err(AuthError::InvalidSessionState.into());
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    // Build redirect URI (must match the one used in the authorization request)
    let redirect_uri = format!("{}/auth/oauth/callback", state.config().base_url);

    // Exchange code for tokens
    let token = state.auth().exchange_code(&code, &redirect_uri).await?;
    let user = establish_session(&state, &session, token).await?;

    tracing::info!(user_id = %user.id, "user authenticated via OAuth");
    Ok(Redirect::to("/account"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_random_string_is_not_constant() {
        assert_ne!(generate_random_string(32), generate_random_string(32));
    }
}
