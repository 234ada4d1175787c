//! Service-role REST client for the commerce backend.
//!
//! Every request carries the service key, which bypasses row-level
//! authorization; this client must never be reachable from the public
//! storefront.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use orchard_core::UserRole;

use crate::config::AdminBackendConfig;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend returned a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The presented bearer token was rejected.
    #[error("invalid token")]
    InvalidToken,
}

/// A backend user as returned by the auth provider's user endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct VerifiedUser {
    pub id: orchard_core::UserId,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Client for the commerce backend's admin API surface.
#[derive(Clone)]
pub struct AdminBackendClient {
    inner: Arc<AdminBackendClientInner>,
}

struct AdminBackendClientInner {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl AdminBackendClient {
    /// Create a new admin backend client.
    #[must_use]
    pub fn new(config: &AdminBackendConfig) -> Self {
        Self {
            inner: Arc::new(AdminBackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        self.inner
            .client
            .request(method, url)
            .bearer_auth(&self.inner.service_key)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(response.url().path().to_string()));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect::<String>(),
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::GET, path)).await
    }

    /// GET a JSON resource with query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::GET, path).query(query))
            .await
    }

    /// POST a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::POST, path).json(body))
            .await
    }

    /// PATCH a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::PATCH, path).json(body))
            .await
    }

    /// DELETE a resource, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), BackendError> {
        let response = self.request(reqwest::Method::DELETE, path).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect::<String>(),
            });
        }
        Ok(())
    }

    /// Resolve the user behind a console bearer token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidToken` if the token is not accepted.
    #[instrument(skip(self, token))]
    pub async fn verify_user(&self, token: &str) -> Result<VerifiedUser, BackendError> {
        let response = self
            .inner
            .client
            .get(format!("{}/auth/user", self.inner.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BackendError::InvalidToken);
        }
        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status().as_u16(),
                message: "user lookup failed".to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Check backend liveness.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .get(format!("{}/health", self.inner.base_url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}
