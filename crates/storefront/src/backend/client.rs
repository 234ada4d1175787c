//! Low-level REST client for the commerce backend.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::BackendConfig;

use super::BackendError;

/// Client for the commerce backend REST API.
///
/// Every request carries the publishable API key; requests made on behalf of
/// a signed-in user additionally carry their bearer token, which the backend
/// uses for row-level authorization.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    public_key: String,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                public_key: config.public_key.clone(),
            }),
        }
    }

    /// The backend base URL (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        self.inner
            .client
            .request(method, url)
            .header("X-Api-Key", &self.inner.public_key)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        let builder = match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(
                response.url().path().to_string(),
            ));
        }

        // Get response body as text first for better error diagnostics
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

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, token), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::GET, path), token)
            .await
    }

    /// GET a JSON resource with query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, query, token), fields(path = %path))]
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::GET, path).query(query), token)
            .await
    }

    /// POST a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::POST, path).json(body), token)
            .await
    }

    /// PUT a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::PUT, path).json(body), token)
            .await
    }

    /// PATCH a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self, body, token), fields(path = %path))]
    pub async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, BackendError> {
        self.send(self.request(reqwest::Method::PATCH, path).json(body), token)
            .await
    }

    /// DELETE a resource, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(path = %path))]
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), BackendError> {
        let response = match token {
            Some(token) => self
                .request(reqwest::Method::DELETE, path)
                .bearer_auth(token),
            None => self.request(reqwest::Method::DELETE, path),
        }
        .send()
        .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect::<String>(),
            });
        }

        Ok(())
    }

    /// Check backend liveness.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), BackendError> {
        let response = self.request(reqwest::Method::GET, "/health").send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}
