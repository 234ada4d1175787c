//! Order route handlers for the admin console.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Order, OrderFilter, UpdateOrderStatusInput};
use crate::state::AppState;

/// Order list with status/date filters.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>> {
    let orders = state
        .backend()
        .get_with_query("/api/admin/orders", &filter)
        .await?;
    Ok(Json(orders))
}

/// Order detail.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = state
        .backend()
        .get(&format!("/api/admin/orders/{id}"))
        .await?;
    Ok(Json(order))
}

/// Move an order to a new status.
///
/// Terminal orders (delivered, cancelled) stay where they are.
#[instrument(skip(state, admin, input))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(input): Json<UpdateOrderStatusInput>,
) -> Result<Json<Order>> {
    let current: Order = state
        .backend()
        .get(&format!("/api/admin/orders/{id}"))
        .await?;

    if current.status.is_terminal() {
        return Err(AdminError::BadRequest(format!(
            "order is already {}",
            current.status
        )));
    }

    let order: Order = state
        .backend()
        .patch(&format!("/api/admin/orders/{id}"), &input)
        .await?;

    tracing::info!(
        order_id = %order.id,
        status = %order.status,
        admin = %admin.email,
        "order status updated"
    );
    Ok(Json(order))
}
