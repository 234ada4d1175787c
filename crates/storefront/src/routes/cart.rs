//! Cart route handlers.
//!
//! Handlers translate between JSON payloads and the session-scoped cart
//! service; the cart semantics themselves live in `orchard_core::cart`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use orchard_core::cart::{CartItem, CartState};
use orchard_core::{CurrencyCode, Price, ProductId};

use crate::backend::{NewOrder, Order, OrderItem, Product};
use crate::error::{AppError, FieldError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Format an amount in the store currency as a display string.
fn format_price(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::USD).display()
}

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub price_display: String,
    pub line_total: Decimal,
    pub line_total_display: String,
    pub image: Option<String>,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub subtotal_display: String,
    pub total_quantity: i64,
    /// Whether the cart is in buy-now mode.
    pub temporary: bool,
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        Self {
            items: state
                .visible()
                .iter()
                .map(|line| CartItemView {
                    id: line.id,
                    name: line.name.clone(),
                    price: line.price,
                    price_display: format_price(line.price),
                    line_total: line.line_total(),
                    line_total_display: format_price(line.line_total()),
                    image: line.image.clone(),
                    quantity: line.quantity,
                    size: line.size.clone(),
                    color: line.color.clone(),
                })
                .collect(),
            subtotal: state.subtotal(),
            subtotal_display: format_price(state.subtotal()),
            total_quantity: state.total_quantity(),
            temporary: state.is_temporary(),
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Add-to-cart / buy-now request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartInput {
    pub product_id: i32,
    pub quantity: Option<i64>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityInput {
    /// Stored verbatim; 0 or below leaves the line in place and callers must
    /// remove it explicitly.
    pub quantity: i64,
}

/// Build a cart line from a catalog product and the request input.
fn cart_line(product: &Product, input: &AddToCartInput, quantity: i64) -> CartItem {
    CartItem {
        id: product.id,
        name: product.name.clone(),
        price: product.price,
        image: product.primary_image().map(String::from),
        quantity,
        size: input.size.clone(),
        color: input.color.clone(),
    }
}

/// Resolve the product being added, validating the requested quantity.
async fn resolve_item(
    state: &AppState,
    input: &AddToCartInput,
) -> Result<CartItem> {
    let quantity = input.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation(vec![FieldError::new(
            "quantity",
            "must be at least 1",
        )]));
    }

    let product = state
        .catalog()
        .product(ProductId::new(input.product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", input.product_id)))?;

    Ok(cart_line(&product, input, quantity))
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart, reconciled against durable storage.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = state.cart().load(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add an item to the cart. Exits buy-now mode.
#[instrument(skip(state, session, input))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<AddToCartInput>,
) -> Result<Json<CartView>> {
    let item = resolve_item(&state, &input).await?;
    let cart = state.cart().add(&session, item).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Update a line's quantity verbatim.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(input): Json<UpdateQuantityInput>,
) -> Result<Json<CartView>> {
    let cart = state
        .cart()
        .update_quantity(&session, ProductId::new(id), input.quantity)
        .await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line. No-op if the product is not in the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<CartView>> {
    let cart = state.cart().remove(&session, ProductId::new(id)).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart and clear durable storage.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = state.cart().clear(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Buy now: the visible cart becomes exactly this one item, without touching
/// the accumulated durable cart.
#[instrument(skip(state, session, input))]
pub async fn buy_now(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<AddToCartInput>,
) -> Result<Json<CartView>> {
    let item = resolve_item(&state, &input).await?;
    let cart = state.cart().buy_now(&session, item).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Place an order from the visible cart.
///
/// In buy-now mode the order contains exactly the temporary item; the
/// accumulated cart is untouched until the post-checkout clear.
#[instrument(skip(state, session, auth))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(auth): RequireAuth,
) -> Result<(StatusCode, Json<Order>)> {
    let cart = state.cart().load(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let order = NewOrder {
        items: cart
            .visible()
            .iter()
            .map(|line| OrderItem {
                product_id: line.id,
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
            })
            .collect(),
        total: cart.subtotal(),
        address_id: None,
    };

    let order: Order = state
        .backend()
        .post("/api/orders", &order, Some(auth.bearer()))
        .await?;

    // The order owns what it consumed: the temporary item after a buy-now,
    // the whole cart otherwise.
    state.cart().finish_checkout(&session).await?;

    Ok((StatusCode::CREATED, Json(order)))
}
