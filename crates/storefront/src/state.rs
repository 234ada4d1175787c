//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, CatalogCache, RestCartStore};
use crate::config::StorefrontConfig;
use crate::services::auth::AuthClient;
use crate::services::cart::CartService;
use crate::services::ratings::RatingService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// service objects constructed once at application start.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    catalog: CatalogCache,
    auth: AuthClient,
    ratings: RatingService,
    cart: CartService<RestCartStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(&config.backend);
        let catalog = CatalogCache::new(backend.clone());
        let auth = AuthClient::new(&config.backend);
        let ratings = RatingService::new(backend.clone());
        let cart = CartService::new(RestCartStore::new(backend.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                catalog,
                auth,
                ratings,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the raw backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the catalog cache.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    /// Get a reference to the auth client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the rating service.
    #[must_use]
    pub fn ratings(&self) -> &RatingService {
        &self.inner.ratings
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService<RestCartStore> {
        &self.inner.cart
    }
}
