//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use orchard_core::ProductId;

use crate::backend::{Page, Product, ProductFilter};
use crate::error::Result;
use crate::state::AppState;

/// Product listing with filter, sort, and pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Page<Product>>> {
    let page = state.catalog().products(&filter).await?;
    Ok(Json(page))
}

/// Product detail.
///
/// A missing product is an empty state for the client, not an error: the
/// body is `null` with a 200 status.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<Product>>> {
    let product = state.catalog().product(ProductId::new(id)).await?;
    Ok(Json(product))
}

/// Related products: same category, excluding the product itself.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Product>>> {
    let related = state
        .catalog()
        .recommendations(ProductId::new(id), 8)
        .await?;
    Ok(Json(related))
}
