//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//!
//! # Dashboard
//! GET  /api/dashboard                   - Aggregated counts and sums
//!
//! # Expenses
//! GET    /api/expenses                  - Expense list (filterable)
//! POST   /api/expenses                  - Create expense
//! PATCH  /api/expenses/{id}             - Update expense
//! DELETE /api/expenses/{id}             - Delete expense
//! GET    /api/expense-categories        - Expense category list
//! POST   /api/expense-categories        - Create expense category
//! DELETE /api/expense-categories/{id}   - Delete expense category
//!
//! # Orders
//! GET   /api/orders                     - Order list (filterable)
//! GET   /api/orders/{id}                - Order detail
//! PATCH /api/orders/{id}/status         - Move an order to a new status
//!
//! # Products
//! GET    /api/products                  - Product list (filterable)
//! POST   /api/products                  - Create product
//! PATCH  /api/products/{id}             - Update product
//! DELETE /api/products/{id}             - Delete product
//! POST   /api/images                    - Upload a product photo
//!
//! # Categories
//! GET    /api/categories                - Category list
//! POST   /api/categories                - Create category
//! PATCH  /api/categories/{id}           - Update category
//! DELETE /api/categories/{id}           - Delete category
//! ```
//!
//! Every `/api` route requires an admin-role bearer token.

pub mod categories;
pub mod dashboard;
pub mod expenses;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Assemble all admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(dashboard::show))
        // Expenses
        .route(
            "/api/expenses",
            get(expenses::index).post(expenses::create),
        )
        .route(
            "/api/expenses/{id}",
            patch(expenses::update).delete(expenses::delete),
        )
        .route(
            "/api/expense-categories",
            get(expenses::categories).post(expenses::create_category),
        )
        .route(
            "/api/expense-categories/{id}",
            axum::routing::delete(expenses::delete_category),
        )
        // Orders
        .route("/api/orders", get(orders::index))
        .route("/api/orders/{id}", get(orders::show))
        .route("/api/orders/{id}/status", patch(orders::update_status))
        // Products
        .route(
            "/api/products",
            get(products::index).post(products::create),
        )
        .route(
            "/api/products/{id}",
            patch(products::update).delete(products::delete),
        )
        .route("/api/images", post(products::upload_image))
        // Categories
        .route(
            "/api/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            patch(categories::update).delete(categories::delete),
        )
}

/// Liveness health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}
