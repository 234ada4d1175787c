//! Image host client.
//!
//! Product photos are not stored by the commerce backend; they go through an
//! external image host that takes a file and returns a durable URL.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::ImageHostConfig;

/// Errors that can occur when uploading an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host rejected the upload.
    #[error("upload rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client for the external image host.
#[derive(Clone)]
pub struct ImageHostClient {
    inner: Arc<ImageHostClientInner>,
}

struct ImageHostClientInner {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl ImageHostClient {
    /// Create a new image host client.
    #[must_use]
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            inner: Arc::new(ImageHostClientInner {
                client: reqwest::Client::new(),
                upload_url: config.upload_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Upload a file and return its durable URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails or the host rejects the file.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ImageError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("key", self.inner.api_key.clone())
            .part("file", part);

        let response = self
            .inner
            .client
            .post(&self.inner.upload_url)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Rejected(format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.url)
    }
}
