//! End-to-end cart behavior through the storefront HTTP surface.
//!
//! Exercises the cart state machine the way the client-rendered pages do:
//! session cookie carrying the in-memory state, stub backend playing the
//! durable store.

use orchard_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn adding_same_product_twice_merges_quantities() {
    let ctx = TestContext::spawn().await;

    ctx.post_json("/api/cart/items", &json!({ "product_id": 1, "quantity": 2 }))
        .await;
    let cart = ctx
        .post_json("/api/cart/items", &json!({ "product_id": 1, "quantity": 3 }))
        .await;

    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 5);
    assert_eq!(cart["temporary"], false);
}

#[tokio::test]
async fn cart_round_trips_through_durable_storage() {
    let ctx = TestContext::spawn().await;

    ctx.post_json("/api/cart/items", &json!({ "product_id": 2 }))
        .await;

    // The write-through landed in the stub store
    assert_eq!(ctx.stub.cart_count(), 1);

    // A later read reconciles against the durable snapshot
    let cart = ctx.get_json("/api/cart").await;
    assert_eq!(cart["items"][0]["id"], 2);
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn buy_now_overrides_visible_cart_and_add_restores_it() {
    let ctx = TestContext::spawn().await;

    // Accumulated cart holds p1
    ctx.post_json("/api/cart/items", &json!({ "product_id": 1 }))
        .await;

    // Buy-now p2: visible cart is exactly [p2]
    let cart = ctx
        .post_json("/api/cart/buy-now", &json!({ "product_id": 2 }))
        .await;
    assert_eq!(cart["temporary"], true);
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["id"], 2);

    // A fresh load sees the stale durable snapshot [p1] resolve and be
    // discarded; the visible single-item cart does not change
    let cart = ctx.get_json("/api/cart").await;
    assert_eq!(cart["temporary"], true);
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["id"], 2);

    // A normal add exits buy-now mode: the accumulated cart comes back,
    // plus the new item; the buy-now item was never committed
    let cart = ctx
        .post_json("/api/cart/items", &json!({ "product_id": 3 }))
        .await;
    assert_eq!(cart["temporary"], false);
    let ids: Vec<i64> = cart["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn removing_missing_line_is_a_noop() {
    let ctx = TestContext::spawn().await;

    ctx.post_json("/api/cart/items", &json!({ "product_id": 1 }))
        .await;

    let response = ctx
        .client
        .delete(ctx.url("/api/cart/items/999"))
        .send()
        .await
        .expect("request");
    assert!(response.status().is_success());

    let cart: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
}

#[tokio::test]
async fn quantity_zero_keeps_the_line() {
    let ctx = TestContext::spawn().await;

    ctx.post_json("/api/cart/items", &json!({ "product_id": 1, "quantity": 2 }))
        .await;

    let response = ctx
        .client
        .patch(ctx.url("/api/cart/items/1"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("request");
    assert!(response.status().is_success());

    // The line stays at quantity 0 until an explicit remove
    let cart = ctx.get_json("/api/cart").await;
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 0);
}

#[tokio::test]
async fn clear_empties_cart_and_durable_storage() {
    let ctx = TestContext::spawn().await;

    ctx.post_json("/api/cart/items", &json!({ "product_id": 1 }))
        .await;
    ctx.post_json("/api/cart/buy-now", &json!({ "product_id": 2 }))
        .await;

    let cart = ctx.post_json("/api/cart/clear", &json!({})).await;
    assert_eq!(cart["items"].as_array().expect("items").len(), 0);
    assert_eq!(cart["temporary"], false);

    // Durable cart is gone too
    assert_eq!(ctx.stub.cart_count(), 0);
}

#[tokio::test]
async fn rejects_invalid_add_requests() {
    let ctx = TestContext::spawn().await;

    // Quantity below one fails validation inline
    let response = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "product_id": 1, "quantity": 0 }))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 422);

    // Unknown product is rejected
    let response = ctx
        .client
        .post(ctx.url("/api/cart/items"))
        .json(&json!({ "product_id": 999 }))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn checkout_requires_auth_and_orders_the_visible_cart() {
    let ctx = TestContext::spawn().await;

    ctx.post_json("/api/cart/items", &json!({ "product_id": 1, "quantity": 2 }))
        .await;

    // Signed out: 401
    let response = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 401);

    ctx.sign_in().await;

    // Buy-now p2, then check out: the order holds exactly the temporary item
    ctx.post_json("/api/cart/buy-now", &json!({ "product_id": 2 }))
        .await;
    let order = ctx.post_json("/api/checkout", &json!({})).await;

    let items = order["items"].as_array().expect("order items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], 2);
    assert_eq!(items[0]["quantity"], 1);

    // Only the buy-now item was consumed: the accumulated cart comes back
    let cart = ctx.get_json("/api/cart").await;
    assert_eq!(cart["temporary"], false);
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["id"], 1);
    assert_eq!(cart["items"][0]["quantity"], 2);

    let orders = ctx.stub.orders.lock().expect("orders lock");
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn empty_checkout_is_a_bad_request() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    let response = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn external_snapshot_wins_on_next_load() {
    let ctx = TestContext::spawn().await;

    // Accumulate p1 so a durable cart exists
    ctx.post_json("/api/cart/items", &json!({ "product_id": 1 }))
        .await;

    // Another tab rewrites the durable cart out from under this session
    let cart_id = {
        let carts = ctx.stub.carts.lock().expect("carts lock");
        carts.keys().next().expect("durable cart").clone()
    };
    let foreign = orchard_core::cart::CartSnapshot {
        items: vec![orchard_core::cart::CartItem {
            id: orchard_core::ProductId::new(3),
            name: "Linen Table Runner".to_string(),
            price: rust_decimal::Decimal::new(2400, 2),
            image: None,
            quantity: 4,
            size: None,
            color: None,
        }],
    };
    ctx.stub.seed_cart(&cart_id, foreign);

    // The next load reconciles last-writer-wins: the snapshot replaces the
    // session's lines verbatim
    let cart = ctx.get_json("/api/cart").await;
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["id"], 3);
    assert_eq!(cart["items"][0]["quantity"], 4);
}
