//! Authentication service.
//!
//! Wraps the commerce backend's built-in auth provider: password sign-in and
//! sign-up, the hosted OAuth redirect flow, token refresh, and current-user
//! retrieval. The access token it returns is the bearer token used for all
//! user-scoped backend API calls.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect the shopper to the provider's hosted login page
//! 3. The provider redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Use the access token for user-scoped API calls

mod error;

pub use error::AuthError;

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use orchard_core::{Email, UserId, UserRole};

use crate::config::BackendConfig;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Tokens issued by the auth provider.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthToken {
    /// Bearer token (JWT) for backend API calls.
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    /// Unix timestamp when the token was obtained.
    pub obtained_at: i64,
}

impl AuthToken {
    /// Whether the access token has expired (with a 30 second safety margin).
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.obtained_at + self.expires_in - 30
    }
}

/// The signed-in user as reported by the auth provider.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    /// Role claim; `is_admin`/`is_super_admin` are derived from it.
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: Option<String>,
    message: Option<String>,
}

/// Client for the backend's auth endpoints.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                auth_url: format!("{}/auth", config.api_url.trim_end_matches('/')),
                client_id: config.oauth_client_id.clone(),
                client_secret: config.oauth_client_secret.expose_secret().to_string(),
            }),
        }
    }

    /// The OAuth client ID (safe to expose in frontend).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        // Validate email format before hitting the provider
        let email = Email::parse(email)?;

        let params = [
            ("grant_type", "password"),
            ("email", email.as_str()),
            ("password", password),
        ];

        self.token_request(&params).await
    }

    /// Register a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthToken, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password,
            "name": name,
        });

        let response = self
            .inner
            .client
            .post(format!("{}/signup", self.inner.auth_url))
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(AuthError::UserAlreadyExists);
        }
        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(stamp(token))
    }

    /// Sign out, revoking the session on the provider side.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .inner
            .client
            .post(format!("{}/logout", self.inner.auth_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }
        Ok(())
    }

    // =========================================================================
    // OAuth Flow
    // =========================================================================

    /// Generate the authorization URL for the hosted login page.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after authentication
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20email%20profile&\
            state={}",
            self.inner.auth_url,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AuthToken, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &self.inner.client_id),
            ("client_secret", &self.inner.client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        self.token_request(&params).await
    }

    /// Refresh an access token using a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token refresh fails.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, AuthError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", &self.inner.client_id),
            ("client_secret", &self.inner.client_secret),
            ("refresh_token", refresh_token),
        ];

        self.token_request(&params).await
    }

    // =========================================================================
    // User Info
    // =========================================================================

    /// Fetch the user the given access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the token is not accepted.
    #[instrument(skip(self, access_token))]
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .inner
            .client
            .get(format!("{}/user", self.inner.auth_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<AuthToken, AuthError> {
        let response = self
            .inner
            .client
            .post(format!("{}/token", self.inner.auth_url))
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::BAD_REQUEST
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(provider_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(stamp(token))
    }
}

fn stamp(token: TokenResponse) -> AuthToken {
    AuthToken {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_in: token.expires_in,
        obtained_at: chrono::Utc::now().timestamp(),
    }
}

async fn provider_error(response: reqwest::Response) -> AuthError {
    let status = response.status();
    let message = match response.json::<ProviderError>().await {
        Ok(body) => body.message.or(body.error).unwrap_or_default(),
        Err(_) => String::new(),
    };
    AuthError::Provider(format!("HTTP {status}: {message}"))
}

/// Validate that a password meets minimum requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_token_expiry() {
        let token = AuthToken {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_in: 3600,
            obtained_at: 1_000,
        };

        assert!(!token.is_expired(1_000));
        assert!(!token.is_expired(4_500));
        // Within the 30 second safety margin
        assert!(token.is_expired(4_571));
        assert!(token.is_expired(10_000));
    }

    #[test]
    fn test_authorization_url_encodes_params() {
        let config = crate::config::BackendConfig {
            api_url: "http://localhost:4000".to_string(),
            public_key: "pk".to_string(),
            oauth_client_id: "client id".to_string(),
            oauth_client_secret: secrecy::SecretString::from("cs"),
        };
        let client = AuthClient::new(&config);

        let url = client.authorization_url("http://localhost:3000/auth/oauth/callback", "st&ate");
        assert!(url.starts_with("http://localhost:4000/auth/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("state=st%26ate"));
        assert!(!url.contains("st&ate"));
    }
}
