//! Durable cart storage collaborator.
//!
//! The backend owns durable cart state; this module is the write-through
//! interface the cart service reconciles against. The trait exists so unit
//! tests can substitute an in-memory store.

use orchard_core::cart::CartSnapshot;
use serde::Deserialize;
use tracing::instrument;

use super::{BackendClient, BackendError};

/// Durable storage for cart snapshots, keyed by a backend-issued cart id.
pub trait CartStore: Clone + Send + Sync + 'static {
    /// Create a new empty durable cart and return its id.
    fn create(&self) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Load the snapshot for a cart id. `Ok(None)` if the cart is gone.
    fn load(
        &self,
        cart_id: &str,
    ) -> impl Future<Output = Result<Option<CartSnapshot>, BackendError>> + Send;

    /// Replace the durable snapshot for a cart id.
    fn save(
        &self,
        cart_id: &str,
        snapshot: &CartSnapshot,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Delete the durable snapshot for a cart id.
    fn clear(&self, cart_id: &str) -> impl Future<Output = Result<(), BackendError>> + Send;
}

#[derive(Debug, Deserialize)]
struct CreatedCart {
    id: String,
}

/// Cart storage backed by the commerce backend's `/api/cart` resource.
#[derive(Clone)]
pub struct RestCartStore {
    backend: BackendClient,
}

impl RestCartStore {
    /// Create a new REST cart store over the given backend client.
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

impl CartStore for RestCartStore {
    #[instrument(skip(self))]
    async fn create(&self) -> Result<String, BackendError> {
        let created: CreatedCart = self
            .backend
            .post("/api/cart", &serde_json::json!({}), None)
            .await?;
        Ok(created.id)
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn load(&self, cart_id: &str) -> Result<Option<CartSnapshot>, BackendError> {
        match self
            .backend
            .get::<CartSnapshot>(&format!("/api/cart/{cart_id}"), None)
            .await
        {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, snapshot), fields(cart_id = %cart_id))]
    async fn save(&self, cart_id: &str, snapshot: &CartSnapshot) -> Result<(), BackendError> {
        let _: CartSnapshot = self
            .backend
            .put(&format!("/api/cart/{cart_id}"), snapshot, None)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn clear(&self, cart_id: &str) -> Result<(), BackendError> {
        match self.backend.delete(&format!("/api/cart/{cart_id}"), None).await {
            // A cart that never made it to durable storage is already clear.
            Ok(()) | Err(BackendError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
