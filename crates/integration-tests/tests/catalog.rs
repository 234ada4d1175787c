//! Catalog and auth behavior through the storefront HTTP surface.

use orchard_integration_tests::{TEST_EMAIL, TestContext};
use serde_json::json;

#[tokio::test]
async fn product_listing_and_filtering() {
    let ctx = TestContext::spawn().await;

    let page = ctx.get_json("/api/products").await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().expect("items").len(), 3);

    let kitchen = ctx.get_json("/api/products?category=1").await;
    assert_eq!(kitchen["items"].as_array().expect("items").len(), 2);

    let search = ctx.get_json("/api/products?q=runner").await;
    assert_eq!(search["items"].as_array().expect("items").len(), 1);
    assert_eq!(search["items"][0]["name"], "Linen Table Runner");
}

#[tokio::test]
async fn missing_product_is_an_empty_state_not_an_error() {
    let ctx = TestContext::spawn().await;

    // 200 with a null body, for the client to render as an empty state
    let product = ctx.get_json("/api/products/999").await;
    assert!(product.is_null());

    let product = ctx.get_json("/api/products/1").await;
    assert_eq!(product["name"], "Walnut Cutting Board");
}

#[tokio::test]
async fn recommendations_share_a_category_and_exclude_self() {
    let ctx = TestContext::spawn().await;

    let related = ctx.get_json("/api/products/1/recommendations").await;
    let items = related.as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 2);
}

#[tokio::test]
async fn categories_listing() {
    let ctx = TestContext::spawn().await;

    let categories = ctx.get_json("/api/categories").await;
    let items = categories.as_array().expect("categories");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Kitchen");
}

#[tokio::test]
async fn ratings_listing_with_average() {
    let ctx = TestContext::spawn().await;

    let ratings = ctx.get_json("/api/products/1/ratings").await;
    assert_eq!(ratings["items"].as_array().expect("items").len(), 1);
    assert_eq!(ratings["average"], 4.0);

    // No reviews: empty state with no average
    let ratings = ctx.get_json("/api/products/3/ratings").await;
    assert_eq!(ratings["items"].as_array().expect("items").len(), 0);
    assert!(ratings["average"].is_null());
}

#[tokio::test]
async fn sign_in_round_trip() {
    let ctx = TestContext::spawn().await;

    // Signed out: /auth/me is null
    let me = ctx.get_json("/auth/me").await;
    assert!(me.is_null());

    // Wrong password is rejected
    let response = ctx
        .client
        .post(ctx.url("/auth/sign-in"))
        .json(&json!({ "email": TEST_EMAIL, "password": "wrong" }))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 401);

    ctx.sign_in().await;

    let me = ctx.get_json("/auth/me").await;
    assert_eq!(me["email"], TEST_EMAIL);
    assert_eq!(me["role"], "customer");

    // Sign out clears the session
    let response = ctx
        .client
        .post(ctx.url("/auth/sign-out"))
        .send()
        .await
        .expect("request");
    assert!(response.status().is_success());

    let me = ctx.get_json("/auth/me").await;
    assert!(me.is_null());
}
