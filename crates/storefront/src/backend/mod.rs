//! Commerce backend REST client.
//!
//! # Architecture
//!
//! - The backend is source of truth - NO local sync, direct API calls
//! - Plain REST/JSON under `/api/...`; no bespoke wire format
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use orchard_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//!
//! // Fetch a product
//! let product: Option<Product> = client
//!     .get(&format!("/api/products/{id}"), None)
//!     .await?;
//! ```

mod cart_store;
mod catalog;
mod client;
pub mod types;

pub use cart_store::{CartStore, RestCartStore};
pub use catalog::{CatalogCache, ProductFilter, ProductSort};
pub use client::BackendClient;
pub use types::*;

use thiserror::Error;

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

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
