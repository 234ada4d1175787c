//! DTOs for the commerce backend's REST resources.
//!
//! All payloads are plain JSON objects; these shapes mirror what the backend
//! returns verbatim.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::{
    AddressId, CategoryId, OrderId, OrderStatus, PaymentStatus, ProductId, RatingId, UserId,
};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Price before discount, if the product is on sale.
    pub compare_at_price: Option<Decimal>,
    pub category_id: CategoryId,
    /// Image URLs, first is primary.
    #[serde(default)]
    pub images: Vec<String>,
    /// Available size variants, empty if not applicable.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Available color variants, empty if not applicable.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Units in stock as last reported by the backend.
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Primary image URL, if the product has images.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A catalog category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image: Option<String>,
}

/// A paginated list response from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Page<T> {
    /// An empty first page.
    #[must_use]
    pub const fn empty(per_page: i64) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            per_page,
            total: 0,
        }
    }
}

/// A product review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Display name of the reviewer.
    pub user_name: String,
    /// Star rating, 1 to 5.
    pub stars: i32,
    pub comment: String,
    /// Photo URLs attached to the review.
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for submitting a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRating {
    pub product_id: ProductId,
    pub stars: i32,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A line of an order as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// An order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_address: Option<Address>,
    pub created_at: DateTime<Utc>,
}

/// Input for placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub address_id: Option<AddressId>,
}

/// A shipping address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Input for creating or updating an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInput {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// A user profile as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

/// Input for updating a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_with_defaults() {
        // Captured backend shape: optional arrays may be omitted entirely.
        let json = r#"{
            "id": 7,
            "name": "Walnut Cutting Board",
            "description": null,
            "price": "54.00",
            "compare_at_price": null,
            "category_id": 2,
            "stock": 12,
            "created_at": "2026-01-15T09:30:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).expect("deserialize product");
        assert_eq!(product.id.as_i32(), 7);
        assert!(product.images.is_empty());
        assert!(product.sizes.is_empty());
        assert_eq!(product.primary_image(), None);
    }

    #[test]
    fn test_page_empty() {
        let page: Page<Product> = Page::empty(24);
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_rating_roundtrip() {
        let json = r#"{
            "id": 1,
            "product_id": 7,
            "user_id": "7be04b24-5bd9-4f52-9783-15d4a4f4f8f7",
            "user_name": "Ana",
            "stars": 5,
            "comment": "Lovely grain.",
            "images": ["https://img.orchardlane.shop/r1.jpg"],
            "created_at": "2026-02-01T12:00:00Z"
        }"#;

        let rating: Rating = serde_json::from_str(json).expect("deserialize rating");
        assert_eq!(rating.stars, 5);
        assert_eq!(rating.images.len(), 1);
    }
}
