//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::AdminBackendClient;
use crate::config::AdminConfig;
use crate::services::images::ImageHostClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: AdminBackendClient,
    images: ImageHostClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let backend = AdminBackendClient::new(&config.backend);
        let images = ImageHostClient::new(&config.images);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                images,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn backend(&self) -> &AdminBackendClient {
        &self.inner.backend
    }

    /// Get a reference to the image host client.
    #[must_use]
    pub fn images(&self) -> &ImageHostClient {
        &self.inner.images
    }
}
