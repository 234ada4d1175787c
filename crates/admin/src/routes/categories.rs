//! Category route handlers for the admin console.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::error::{AdminError, FieldError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CategoryInput};
use crate::state::AppState;

fn validate(input: &CategoryInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AdminError::Validation(vec![FieldError::new(
            "name",
            "must not be empty",
        )]));
    }
    Ok(())
}

/// Category list.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Category>>> {
    let categories = state.backend().get("/api/categories").await?;
    Ok(Json(categories))
}

/// Create a category.
#[instrument(skip(state, _admin, input))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    validate(&input)?;

    let category = state.backend().post("/api/admin/categories", &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category.
#[instrument(skip(state, _admin, input))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>> {
    validate(&input)?;

    let category = state
        .backend()
        .patch(&format!("/api/admin/categories/{id}"), &input)
        .await?;
    Ok(Json(category))
}

/// Delete a category.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state
        .backend()
        .delete(&format!("/api/admin/categories/{id}"))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
