//! Product route handlers for the admin console.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AdminError, FieldError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminProductFilter, CreateProductInput, Product, UpdateProductInput};
use crate::state::AppState;

fn validate_create(input: &CreateProductInput) -> Result<()> {
    let mut fields = Vec::new();

    if input.name.trim().is_empty() {
        fields.push(FieldError::new("name", "must not be empty"));
    }
    if input.price <= Decimal::ZERO {
        fields.push(FieldError::new("price", "must be positive"));
    }
    if input.stock < 0 {
        fields.push(FieldError::new("stock", "must not be negative"));
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AdminError::Validation(fields))
    }
}

fn validate_update(input: &UpdateProductInput) -> Result<()> {
    let mut fields = Vec::new();

    if let Some(name) = &input.name
        && name.trim().is_empty()
    {
        fields.push(FieldError::new("name", "must not be empty"));
    }
    if let Some(price) = input.price
        && price <= Decimal::ZERO
    {
        fields.push(FieldError::new("price", "must be positive"));
    }
    if let Some(stock) = input.stock
        && stock < 0
    {
        fields.push(FieldError::new("stock", "must not be negative"));
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AdminError::Validation(fields))
    }
}

/// Product list with category/search filters.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<AdminProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .backend()
        .get_with_query("/api/admin/products", &filter)
        .await?;
    Ok(Json(products))
}

/// Create a product.
#[instrument(skip(state, _admin, input))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_create(&input)?;

    let product = state.backend().post("/api/admin/products", &input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
#[instrument(skip(state, _admin, input))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>> {
    validate_update(&input)?;

    let product = state
        .backend()
        .patch(&format!("/api/admin/products/{id}"), &input)
        .await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state
        .backend()
        .delete(&format!("/api/admin/products/{id}"))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Response for an uploaded image.
#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Upload a product photo to the image host and return its durable URL.
///
/// Accepts a multipart form with a single `file` field.
#[instrument(skip(state, _admin, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedImage>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AdminError::BadRequest(format!("failed to read file: {e}")))?;

        let url = state
            .images()
            .upload(&file_name, &content_type, bytes.to_vec())
            .await?;

        return Ok((StatusCode::CREATED, Json(UploadedImage { url })));
    }

    Err(AdminError::BadRequest("missing 'file' field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::CategoryId;

    fn create_input() -> CreateProductInput {
        CreateProductInput {
            name: "Walnut Cutting Board".to_string(),
            description: None,
            price: Decimal::new(5400, 2),
            compare_at_price: None,
            category_id: CategoryId::new(2),
            images: vec![],
            sizes: vec![],
            colors: vec![],
            stock: 12,
        }
    }

    #[test]
    fn test_validate_create_accepts_good_input() {
        assert!(validate_create(&create_input()).is_ok());
    }

    #[test]
    fn test_validate_create_collects_failures() {
        let mut bad = create_input();
        bad.name = String::new();
        bad.price = Decimal::ZERO;
        bad.stock = -1;

        let Err(AdminError::Validation(fields)) = validate_create(&bad) else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_validate_update_ignores_absent_fields() {
        assert!(validate_update(&UpdateProductInput::default()).is_ok());
    }

    #[test]
    fn test_validate_update_checks_present_fields() {
        let input = UpdateProductInput {
            price: Some(Decimal::ZERO),
            ..UpdateProductInput::default()
        };
        assert!(matches!(
            validate_update(&input),
            Err(AdminError::Validation(_))
        ));
    }
}
