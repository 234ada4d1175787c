//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the backend)
//!
//! # Catalog
//! GET  /api/products                    - Product listing (filter/sort/paginate)
//! GET  /api/products/{id}               - Product detail (null if missing)
//! GET  /api/products/{id}/recommendations - Related products
//! GET  /api/categories                  - Category listing
//!
//! # Ratings
//! GET  /api/products/{id}/ratings       - Reviews for a product
//! POST /api/products/{id}/ratings       - Submit a review (requires auth)
//!
//! # Cart
//! GET    /api/cart                      - Current cart view
//! POST   /api/cart/items                - Add item (exits buy-now mode)
//! PATCH  /api/cart/items/{id}           - Update line quantity
//! DELETE /api/cart/items/{id}           - Remove line
//! POST   /api/cart/clear                - Empty cart and durable storage
//! POST   /api/cart/buy-now              - Single-item temporary cart
//! POST   /api/checkout                  - Place an order from the visible cart
//!
//! # Auth
//! POST /auth/sign-in                    - Password sign-in
//! POST /auth/sign-up                    - Account registration
//! POST /auth/sign-out                   - Sign out
//! GET  /auth/me                         - Current user, null if signed out
//! GET  /auth/oauth/login                - Redirect to the hosted login page
//! GET  /auth/oauth/callback             - Handle the OAuth callback
//!
//! # Account (requires auth)
//! GET    /api/account/profile           - Profile
//! PATCH  /api/account/profile           - Update profile
//! GET    /api/account/addresses         - Address list
//! POST   /api/account/addresses         - Create address
//! PATCH  /api/account/addresses/{id}    - Update address
//! DELETE /api/account/addresses/{id}    - Delete address
//! GET    /api/account/orders            - Order history
//! GET    /api/account/orders/{id}       - Order detail
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod products;
pub mod ratings;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/recommendations", get(products::recommendations))
        .route(
            "/{id}/ratings",
            get(ratings::index).post(ratings::create),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", axum::routing::patch(cart::update).delete(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/buy-now", post(cart::buy_now))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
        .route("/oauth/login", get(auth::oauth_login))
        .route("/oauth/callback", get(auth::oauth_callback))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(account::profile).patch(account::update_profile),
        )
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            axum::routing::patch(account::update_address).delete(account::delete_address),
        )
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
}

/// Assemble all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/categories", get(categories::index))
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(cart::checkout))
        .nest("/api/account", account_routes())
        .nest("/auth", auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies backend connectivity before returning OK.
/// Returns 503 Service Unavailable if the backend is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.backend().health().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
