//! Integration test harness for Orchard Lane.
//!
//! Spins up a stub commerce backend on a local listener, points a real
//! storefront router at it, and exposes a cookie-holding HTTP client. Tests
//! drive the storefront exactly the way the client-rendered pages do.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::spawn().await;
//! let cart: serde_json::Value = ctx
//!     .post_json("/api/cart/items", &serde_json::json!({"product_id": 1}))
//!     .await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::{StatusCode, header::HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;
use uuid::Uuid;

use orchard_core::cart::CartSnapshot;
use orchard_core::{CategoryId, OrderId, OrderStatus, PaymentStatus, ProductId, RatingId, UserId};
use orchard_storefront::backend::{Category, NewOrder, Order, Page, Product, Rating};
use orchard_storefront::config::{BackendConfig, StorefrontConfig};
use orchard_storefront::state::AppState;

/// Test credentials accepted by the stub auth provider.
pub const TEST_EMAIL: &str = "shopper@example.com";
pub const TEST_PASSWORD: &str = "orchard-lane-pw";
/// Bearer token issued by the stub auth provider.
pub const TEST_TOKEN: &str = "stub-access-token";

/// Shared state of the stub backend, inspectable from tests.
#[derive(Clone, Default)]
pub struct StubBackend {
    pub carts: Arc<Mutex<HashMap<String, CartSnapshot>>>,
    pub orders: Arc<Mutex<Vec<Order>>>,
    next_cart_id: Arc<AtomicI64>,
    next_order_id: Arc<AtomicI64>,
}

impl StubBackend {
    /// Number of durable carts currently stored.
    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.carts.lock().expect("carts lock").len()
    }

    /// Seed a durable cart directly, bypassing the storefront.
    pub fn seed_cart(&self, cart_id: &str, snapshot: CartSnapshot) {
        self.carts
            .lock()
            .expect("carts lock")
            .insert(cart_id.to_string(), snapshot);
    }
}

/// Catalog fixture served by the stub backend.
#[must_use]
pub fn fixture_products() -> Vec<Product> {
    let product = |id: i32, name: &str, cents: i64, category: i32| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        price: Decimal::new(cents, 2),
        compare_at_price: None,
        category_id: CategoryId::new(category),
        images: vec![format!("https://img.orchardlane.test/{id}.jpg")],
        sizes: vec![],
        colors: vec![],
        stock: 10,
        created_at: Utc::now(),
    };

    vec![
        product(1, "Walnut Cutting Board", 5400, 1),
        product(2, "Oak Serving Tray", 3200, 1),
        product(3, "Linen Table Runner", 2400, 5),
    ]
}

fn fixture_categories() -> Vec<Category> {
    vec![
        Category {
            id: CategoryId::new(1),
            name: "Kitchen".to_string(),
            image: None,
        },
        Category {
            id: CategoryId::new(5),
            name: "Textiles".to_string(),
            image: None,
        },
    ]
}

fn fixture_user_id() -> UserId {
    UserId::new(Uuid::from_u128(0x6f5e_4d3c_2b1a))
}

fn fixture_ratings(product_id: ProductId) -> Vec<Rating> {
    if product_id != ProductId::new(1) {
        return Vec::new();
    }
    vec![Rating {
        id: RatingId::new(1),
        product_id,
        user_id: fixture_user_id(),
        user_name: "Ana".to_string(),
        stars: 4,
        comment: "Lovely grain.".to_string(),
        images: vec![],
        created_at: Utc::now(),
    }]
}

// =============================================================================
// Stub Handlers
// =============================================================================

#[derive(Debug, serde::Deserialize)]
struct StubProductFilter {
    category: Option<i32>,
    q: Option<String>,
}

async fn stub_products(Query(filter): Query<StubProductFilter>) -> Json<Page<Product>> {
    let items: Vec<Product> = fixture_products()
        .into_iter()
        .filter(|p| filter.category.is_none_or(|c| p.category_id.as_i32() == c))
        .filter(|p| {
            filter
                .q
                .as_ref()
                .is_none_or(|q| p.name.to_lowercase().contains(&q.to_lowercase()))
        })
        .collect();

    let total = i64::try_from(items.len()).unwrap_or(0);
    Json(Page {
        items,
        page: 1,
        per_page: 24,
        total,
    })
}

async fn stub_product(Path(id): Path<i32>) -> Response {
    match fixture_products()
        .into_iter()
        .find(|p| p.id == ProductId::new(id))
    {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, serde::Deserialize)]
struct StubRatingFilter {
    product_id: i32,
}

async fn stub_ratings(Query(filter): Query<StubRatingFilter>) -> Json<Vec<Rating>> {
    Json(fixture_ratings(ProductId::new(filter.product_id)))
}

async fn stub_create_cart(State(stub): State<StubBackend>) -> Json<serde_json::Value> {
    let id = stub.next_cart_id.fetch_add(1, Ordering::SeqCst);
    let cart_id = format!("cart-{id}");
    stub.carts
        .lock()
        .expect("carts lock")
        .insert(cart_id.clone(), CartSnapshot::default());
    Json(serde_json::json!({ "id": cart_id }))
}

async fn stub_get_cart(State(stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    match stub.carts.lock().expect("carts lock").get(&id) {
        Some(snapshot) => Json(snapshot.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stub_put_cart(
    State(stub): State<StubBackend>,
    Path(id): Path<String>,
    Json(snapshot): Json<CartSnapshot>,
) -> Json<CartSnapshot> {
    stub.carts
        .lock()
        .expect("carts lock")
        .insert(id, snapshot.clone());
    Json(snapshot)
}

async fn stub_delete_cart(State(stub): State<StubBackend>, Path(id): Path<String>) -> StatusCode {
    match stub.carts.lock().expect("carts lock").remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn stub_create_order(
    State(stub): State<StubBackend>,
    headers: HeaderMap,
    Json(input): Json<NewOrder>,
) -> Response {
    if bearer(&headers) != Some(TEST_TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let id = stub.next_order_id.fetch_add(1, Ordering::SeqCst);
    let order = Order {
        id: OrderId::new(i32::try_from(id).unwrap_or(0)),
        user_id: fixture_user_id(),
        items: input.items,
        total: input.total,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        shipping_address: None,
        created_at: Utc::now(),
    };
    stub.orders.lock().expect("orders lock").push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

async fn stub_token(Form(params): Form<HashMap<String, String>>) -> Response {
    let grant_type = params.get("grant_type").map(String::as_str);
    let authorized = match grant_type {
        Some("password") => {
            params.get("email").map(String::as_str) == Some(TEST_EMAIL)
                && params.get("password").map(String::as_str) == Some(TEST_PASSWORD)
        }
        Some("refresh_token" | "authorization_code") => true,
        _ => false,
    };

    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(serde_json::json!({
        "access_token": TEST_TOKEN,
        "refresh_token": "stub-refresh-token",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn stub_user(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(TEST_TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(serde_json::json!({
        "id": fixture_user_id(),
        "email": TEST_EMAIL,
        "name": "Test Shopper",
        "role": "customer",
    }))
    .into_response()
}

/// Build the stub backend router.
#[must_use]
pub fn stub_router(stub: StubBackend) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/categories", get(|| async { Json(fixture_categories()) }))
        .route("/api/products", get(stub_products))
        .route("/api/products/{id}", get(stub_product))
        .route("/api/ratings", get(stub_ratings))
        .route("/api/cart", post(stub_create_cart))
        .route(
            "/api/cart/{id}",
            get(stub_get_cart)
                .put(stub_put_cart)
                .delete(stub_delete_cart),
        )
        .route("/api/orders", post(stub_create_order))
        .route("/auth/token", post(stub_token))
        .route("/auth/user", get(stub_user))
        .with_state(stub)
}

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront wired to a stub backend.
pub struct TestContext {
    /// Base URL of the storefront under test.
    pub base_url: String,
    /// Cookie-holding client, so the session survives across requests.
    pub client: reqwest::Client,
    /// Handle onto the stub backend's state.
    pub stub: StubBackend,
}

impl TestContext {
    /// Start the stub backend and a storefront pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to bind; tests cannot proceed without
    /// them.
    pub async fn spawn() -> Self {
        // Stub backend on an ephemeral port
        let stub = StubBackend::default();
        let backend_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let backend_addr = backend_listener.local_addr().expect("stub backend addr");
        let backend_router = stub_router(stub.clone());
        tokio::spawn(async move {
            axum::serve(backend_listener, backend_router)
                .await
                .expect("stub backend serve");
        });

        // Storefront on an ephemeral port, configured against the stub
        let storefront_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let storefront_addr = storefront_listener.local_addr().expect("storefront addr");

        let config = StorefrontConfig {
            host: storefront_addr.ip(),
            port: storefront_addr.port(),
            base_url: format!("http://{storefront_addr}"),
            session_secret: SecretString::from("integration-session-key-0123456789ab".to_string()),
            backend: BackendConfig {
                api_url: format!("http://{backend_addr}"),
                public_key: "stub-public-key".to_string(),
                oauth_client_id: "stub-client-id".to_string(),
                oauth_client_secret: SecretString::from("stub-client-secret".to_string()),
            },
            sentry_dsn: None,
        };

        let app = orchard_storefront::app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(storefront_listener, app)
                .await
                .expect("storefront serve");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("build client");

        let ctx = Self {
            base_url: format!("http://{storefront_addr}"),
            client,
            stub,
        };
        ctx.wait_until_ready().await;
        ctx
    }

    async fn wait_until_ready(&self) {
        for _ in 0..50 {
            if let Ok(response) = self.client.get(self.url("/health")).send().await
                && response.status().is_success()
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("storefront did not become ready");
    }

    /// Full URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and parse the JSON response, asserting success.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request");
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response.json().await.expect("json body")
    }

    /// POST a JSON body and parse the JSON response, asserting success.
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> serde_json::Value {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request");
        assert!(
            response.status().is_success(),
            "POST {path} returned {}",
            response.status()
        );
        response.json().await.expect("json body")
    }

    /// Sign in with the stub credentials; the session cookie does the rest.
    pub async fn sign_in(&self) {
        self.post_json(
            "/auth/sign-in",
            &serde_json::json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }),
        )
        .await;
    }
}
