//! Category route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::backend::Category;
use crate::error::Result;
use crate::state::AppState;

/// Category listing, served from the preloaded cache.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.catalog().categories().await?;
    Ok(Json(categories))
}
