//! Cart and temporary-cart ("buy now") state machine.
//!
//! The cart is an ordered sequence of lines keyed by product id. A separate
//! "temporary" slot supports buy-now flows: while it is occupied, the visible
//! cart is exactly that one item, regardless of what durable storage reports,
//! and write-through persistence is suppressed.
//!
//! This module is pure state manipulation. Loading snapshots from durable
//! storage and writing mutations back is the storefront's cart service; the
//! snapshot it resolves is fed in through [`CartState::apply_snapshot`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A single cart line.
///
/// Identity is the product id alone: there is no composite key for variants,
/// so adding the same product with a different size/color merges into the
/// existing line (quantities sum, the existing line's fields win).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id; unique within the cart.
    pub id: ProductId,
    /// Product name at time of adding.
    pub name: String,
    /// Unit price at time of adding, in the store currency.
    pub price: Decimal,
    /// Primary product image URL, if any.
    pub image: Option<String>,
    /// Line quantity. Callers keep this >= 1; `update_quantity` itself
    /// accepts any integer (see the method docs).
    pub quantity: i64,
    /// Selected size variant, if the product has sizes.
    pub size: Option<String>,
    /// Selected color variant, if the product has colors.
    pub color: Option<String>,
}

impl CartItem {
    /// Line total (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A snapshot of cart lines as resolved from durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
}

/// The cart state machine.
///
/// `lines` is the normal accumulated cart. `temporary` is the buy-now
/// override: while `Some`, the visible cart is exactly that item and the
/// normal lines are untouched underneath, so exiting temporary mode returns
/// to the accumulated cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartState {
    lines: Vec<CartItem>,
    temporary: Option<CartItem>,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            temporary: None,
        }
    }

    /// The cart as the user sees it: the temporary item alone while buy-now
    /// mode is active, the accumulated lines otherwise.
    #[must_use]
    pub fn visible(&self) -> &[CartItem] {
        match &self.temporary {
            Some(item) => std::slice::from_ref(item),
            None => &self.lines,
        }
    }

    /// Whether buy-now mode is active.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.temporary.is_some()
    }

    /// Whether the visible cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible().is_empty()
    }

    /// Total quantity across visible lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.visible().iter().map(|line| line.quantity).sum()
    }

    /// Subtotal across visible lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.visible().iter().map(CartItem::line_total).sum()
    }

    /// Add an item to the cart.
    ///
    /// Exits buy-now mode. If a line with the same product id exists, its
    /// quantity is increased by the incoming quantity and its other fields
    /// are kept; otherwise the item is appended. No upper bound on quantity
    /// is enforced here - stock limits are a caller concern.
    pub fn add(&mut self, item: CartItem) {
        self.temporary = None;

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == item.id) {
            line.quantity += item.quantity;
        } else {
            self.lines.push(item);
        }
    }

    /// Remove the line with the given product id.
    ///
    /// No-op if the id is not present. Does not exit buy-now mode; only
    /// [`add`](Self::add) and [`clear`](Self::clear) do.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.retain(|line| line.id != id);
    }

    /// Set the quantity for the matching line.
    ///
    /// Accepts any integer and stores it verbatim: a quantity of 0 or below
    /// leaves the line in place, and callers must invoke
    /// [`remove`](Self::remove) to drop it. No-op if the id is not present.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart and exit buy-now mode.
    ///
    /// The caller is responsible for also clearing durable storage; this is
    /// the one mutation whose service wrapper awaits an external effect.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.temporary = None;
    }

    /// Enter buy-now mode with a single item.
    ///
    /// The visible cart becomes exactly `[item]`, independent of whatever is
    /// currently persisted. Persistence writes are suppressed until the next
    /// [`add`](Self::add) or [`clear`](Self::clear) exits the mode, so the
    /// accumulated cart is never polluted by a buy-now selection.
    pub fn add_temporary(&mut self, item: CartItem) {
        self.temporary = Some(item);
    }

    /// Exit buy-now mode without touching the accumulated lines.
    ///
    /// Used after a buy-now checkout: the order consumed the temporary item
    /// only, and the accumulated cart comes back into view.
    pub fn drop_temporary(&mut self) {
        self.temporary = None;
    }

    /// Reconcile against a snapshot resolved from durable storage.
    ///
    /// While buy-now mode is active the snapshot is discarded and the visible
    /// cart stays at the single temporary item. Otherwise the snapshot
    /// replaces the lines verbatim: last writer wins, no merge. A snapshot
    /// that resolves after an optimistic local mutation therefore overwrites
    /// it - observed behavior of the persistence contract, kept as-is.
    pub fn apply_snapshot(&mut self, snapshot: CartSnapshot) {
        if self.temporary.is_some() {
            return;
        }
        self.lines = snapshot.items;
    }

    /// Snapshot of the lines that should be written through to storage.
    ///
    /// Returns `None` while buy-now mode is active: temporary carts are never
    /// persisted.
    #[must_use]
    pub fn persistable(&self) -> Option<CartSnapshot> {
        if self.temporary.is_some() {
            return None;
        }
        Some(CartSnapshot {
            items: self.lines.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i32, quantity: i64) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(1999, 2),
            image: None,
            quantity,
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = CartState::new();
        cart.add(item(1, 2));
        cart.add(item(1, 3));

        assert_eq!(cart.visible().len(), 1);
        assert_eq!(cart.visible()[0].quantity, 5);
    }

    #[test]
    fn test_add_keeps_existing_line_fields() {
        let mut cart = CartState::new();
        let mut first = item(1, 1);
        first.size = Some("M".to_string());
        cart.add(first);

        let mut second = item(1, 1);
        second.size = Some("L".to_string());
        cart.add(second);

        // Identity is the product id alone: the second size collapses into
        // the existing line and the existing fields win.
        assert_eq!(cart.visible().len(), 1);
        assert_eq!(cart.visible()[0].size.as_deref(), Some("M"));
        assert_eq!(cart.visible()[0].quantity, 2);
    }

    #[test]
    fn test_temporary_overrides_visible_cart() {
        let mut cart = CartState::new();
        cart.add(item(1, 1));
        cart.add_temporary(item(2, 1));

        assert!(cart.is_temporary());
        assert_eq!(cart.visible().len(), 1);
        assert_eq!(cart.visible()[0].id, ProductId::new(2));
    }

    #[test]
    fn test_add_exits_temporary_and_restores_accumulated_cart() {
        let mut cart = CartState::new();
        // Persistence had [p1].
        cart.apply_snapshot(CartSnapshot {
            items: vec![item(1, 1)],
        });
        cart.add_temporary(item(2, 1));
        cart.add(item(3, 1));

        assert!(!cart.is_temporary());
        let ids: Vec<i32> = cart.visible().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_drop_temporary_restores_accumulated_lines() {
        let mut cart = CartState::new();
        cart.add(item(1, 2));
        cart.add_temporary(item(2, 1));
        cart.drop_temporary();

        assert!(!cart.is_temporary());
        assert_eq!(cart.visible().len(), 1);
        assert_eq!(cart.visible()[0].id, ProductId::new(1));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartState::new();
        cart.add(item(1, 1));
        cart.remove(ProductId::new(99));

        assert_eq!(cart.visible().len(), 1);
    }

    #[test]
    fn test_update_quantity_to_zero_keeps_line() {
        let mut cart = CartState::new();
        cart.add(item(1, 2));
        cart.update_quantity(ProductId::new(1), 0);

        // The line stays; callers must remove() explicitly.
        assert_eq!(cart.visible().len(), 1);
        assert_eq!(cart.visible()[0].quantity, 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = CartState::new();
        cart.add(item(1, 2));
        cart.add_temporary(item(2, 1));
        cart.clear();

        assert!(cart.is_empty());
        assert!(!cart.is_temporary());
    }

    #[test]
    fn test_stale_snapshot_ignored_in_temporary_mode() {
        let mut cart = CartState::new();
        cart.add_temporary(item(2, 1));
        cart.apply_snapshot(CartSnapshot {
            items: vec![item(1, 4)],
        });

        assert_eq!(cart.visible().len(), 1);
        assert_eq!(cart.visible()[0].id, ProductId::new(2));
    }

    #[test]
    fn test_snapshot_is_last_writer_wins() {
        let mut cart = CartState::new();
        cart.add(item(1, 2));
        cart.apply_snapshot(CartSnapshot {
            items: vec![item(3, 1)],
        });

        let ids: Vec<i32> = cart.visible().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_persistable_suppressed_in_temporary_mode() {
        let mut cart = CartState::new();
        cart.add(item(1, 1));
        assert!(cart.persistable().is_some());

        cart.add_temporary(item(2, 1));
        assert!(cart.persistable().is_none());
    }

    #[test]
    fn test_subtotal_and_quantity() {
        let mut cart = CartState::new();
        cart.add(item(1, 2));
        cart.add(item(2, 1));

        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Decimal::new(5997, 2));
    }
}
