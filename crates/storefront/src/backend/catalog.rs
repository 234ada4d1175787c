//! Catalog cache - the data preloader.
//!
//! Category and product lists are fetched once at application start and kept
//! in a `moka` cache (5-minute TTL) so pages can look entities up by id
//! without a round trip per request. Filtered or searched listings bypass
//! the cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use orchard_core::{CategoryId, ProductId};

use super::types::{Category, Page, Product};
use super::{BackendClient, BackendError};

/// Default page size for product listings.
const DEFAULT_PER_PAGE: i64 = 24;

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
    Categories(Vec<Category>),
}

/// Sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

/// Filter, sort, and pagination parameters for product listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<CategoryId>,
    /// Free-text search term.
    pub q: Option<String>,
    pub sort: Option<ProductSort>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ProductFilter {
    /// Whether this filter is the default listing (cacheable).
    fn is_default(&self) -> bool {
        self.category.is_none()
            && self.q.is_none()
            && self.sort.is_none()
            && self.page.unwrap_or(1) == 1
    }
}

/// Cached, read-through access to the backend catalog.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CatalogCacheInner>,
}

struct CatalogCacheInner {
    backend: BackendClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogCache {
    /// Create a new catalog cache over the given backend client.
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogCacheInner { backend, cache }),
        }
    }

    /// Warm the cache with the category list and the first product page.
    ///
    /// Called once at startup; failures are logged and left to read-through
    /// on first request.
    pub async fn preload(&self) {
        if let Err(e) = self.categories().await {
            tracing::warn!("catalog preload: categories failed: {e}");
        }
        if let Err(e) = self.products(&ProductFilter::default()).await {
            tracing::warn!("catalog preload: products failed: {e}");
        }
    }

    /// Get the category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.inner.backend.get("/api/categories", None).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Look up a category by id from the cached list.
    ///
    /// # Errors
    ///
    /// Returns an error if the category list cannot be fetched.
    pub async fn category(&self, id: CategoryId) -> Result<Option<Category>, BackendError> {
        let categories = self.categories().await?;
        Ok(categories.into_iter().find(|c| c.id == id))
    }

    /// Get a paginated, filtered product listing.
    ///
    /// Only the default listing (no filter, no search, first page) is cached;
    /// filtered requests always hit the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn products(&self, filter: &ProductFilter) -> Result<Page<Product>, BackendError> {
        let cacheable = filter.is_default();
        let cache_key = "products:default".to_string();

        if cacheable
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut filter = filter.clone();
        if filter.per_page.is_none() {
            filter.per_page = Some(DEFAULT_PER_PAGE);
        }

        let products: Page<Product> = self
            .inner
            .backend
            .get_with_query("/api/products", &filter, None)
            .await?;

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// Returns `Ok(None)` if the product does not exist - missing catalog
    /// data is an empty state, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let product: Option<Product> = match self
            .inner
            .backend
            .get(&format!("/api/products/{id}"), None)
            .await
        {
            Ok(product) => Some(product),
            Err(BackendError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        if let Some(ref product) = product {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }

    /// Products related to the given one: same category, excluding itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn recommendations(
        &self,
        id: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, BackendError> {
        let Some(product) = self.product(id).await? else {
            return Ok(Vec::new());
        };

        let related = self
            .products(&ProductFilter {
                category: Some(product.category_id),
                ..ProductFilter::default()
            })
            .await?;

        Ok(related
            .items
            .into_iter()
            .filter(|p| p.id != id)
            .take(limit)
            .collect())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_cacheable() {
        assert!(ProductFilter::default().is_default());
        assert!(
            ProductFilter {
                page: Some(1),
                ..ProductFilter::default()
            }
            .is_default()
        );
    }

    #[test]
    fn test_filtered_listing_is_not_cacheable() {
        assert!(
            !ProductFilter {
                q: Some("walnut".to_string()),
                ..ProductFilter::default()
            }
            .is_default()
        );
        assert!(
            !ProductFilter {
                page: Some(2),
                ..ProductFilter::default()
            }
            .is_default()
        );
    }
}
