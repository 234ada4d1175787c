//! Account route handlers: profile, addresses, and order history.
//!
//! All handlers require a signed-in user; the user's bearer token scopes the
//! backend queries to their own rows.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::backend::{Address, AddressInput, Order, Profile, ProfileUpdate};
use crate::error::{AppError, FieldError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

fn validate_address(input: &AddressInput) -> Result<()> {
    let mut fields = Vec::new();

    for (field, value) in [
        ("name", &input.name),
        ("line1", &input.line1),
        ("city", &input.city),
        ("postal_code", &input.postal_code),
        ("country", &input.country),
    ] {
        if value.trim().is_empty() {
            fields.push(FieldError::new(field, "must not be empty"));
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// Profile of the signed-in user.
#[instrument(skip(state, auth))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<Profile>> {
    let profile = state
        .backend()
        .get("/api/profile", Some(auth.bearer()))
        .await?;
    Ok(Json(profile))
}

/// Update the signed-in user's profile.
#[instrument(skip(state, auth, input))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<ProfileUpdate>,
) -> Result<Json<Profile>> {
    let profile = state
        .backend()
        .patch("/api/profile", &input, Some(auth.bearer()))
        .await?;
    Ok(Json(profile))
}

/// Address list of the signed-in user.
#[instrument(skip(state, auth))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = state
        .backend()
        .get("/api/addresses", Some(auth.bearer()))
        .await?;
    Ok(Json(addresses))
}

/// Create an address.
#[instrument(skip(state, auth, input))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Json(input): Json<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    validate_address(&input)?;

    let address = state
        .backend()
        .post("/api/addresses", &input, Some(auth.bearer()))
        .await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Update an address.
#[instrument(skip(state, auth, input))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<i32>,
    Json(input): Json<AddressInput>,
) -> Result<Json<Address>> {
    validate_address(&input)?;

    let address = state
        .backend()
        .patch(&format!("/api/addresses/{id}"), &input, Some(auth.bearer()))
        .await?;
    Ok(Json(address))
}

/// Delete an address.
#[instrument(skip(state, auth))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    state
        .backend()
        .delete(&format!("/api/addresses/{id}"), Some(auth.bearer()))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Order history of the signed-in user.
#[instrument(skip(state, auth))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = state
        .backend()
        .get("/api/orders", Some(auth.bearer()))
        .await?;
    Ok(Json(orders))
}

/// A single order of the signed-in user.
#[instrument(skip(state, auth))]
pub async fn order(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = state
        .backend()
        .get(&format!("/api/orders/{id}"), Some(auth.bearer()))
        .await?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AddressInput {
        AddressInput {
            name: "Ana".to_string(),
            line1: "1 Orchard Ln".to_string(),
            line2: None,
            city: "Portland".to_string(),
            region: Some("OR".to_string()),
            postal_code: "97201".to_string(),
            country: "US".to_string(),
            phone: None,
            is_default: true,
        }
    }

    #[test]
    fn test_validate_address_accepts_complete_input() {
        assert!(validate_address(&input()).is_ok());
    }

    #[test]
    fn test_validate_address_collects_all_blank_fields() {
        let mut bad = input();
        bad.city = String::new();
        bad.country = "  ".to_string();

        let Err(AppError::Validation(fields)) = validate_address(&bad) else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["city", "country"]);
    }
}
