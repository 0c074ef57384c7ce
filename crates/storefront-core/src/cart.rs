//! # Cart Ledger
//!
//! The authoritative list of line items plus their derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  Page Action              Ledger Call              Effect               │
//! │  ───────────              ───────────              ──────               │
//! │                                                                         │
//! │  Add to Cart ────────────► add_item() ───────────► qty+1 or push        │
//! │                                                                         │
//! │  + / - buttons ──────────► update_quantity() ────► set qty / remove     │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_item() ────────► retain != id         │
//! │                                                                         │
//! │  Clear / Checkout ───────► clear() ──────────────► items.clear()        │
//! │                                                                         │
//! │  Every mutation ends with try_recompute(): both aggregates are          │
//! │  re-derived from the items by a full, overflow-checked reduction.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id, kept in first-add order
//! - Every line has `quantity >= 1`
//! - Every line has a non-negative unit price
//! - `total_item_count` and `total_price` always equal the reduction over items,
//!   computed without overflow; a mutation that would overflow is refused

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::types::ProductCandidate;

// =============================================================================
// Cart Line Item
// =============================================================================

/// One product-quantity pairing in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Product id, unique within the ledger.
    pub id: String,

    pub name: String,

    /// Price per unit, captured when the item was first added.
    #[serde(rename = "price")]
    pub unit_price: Money,

    /// Always at least 1 while the line is in the ledger.
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartLineItem {
    fn from_candidate(candidate: ProductCandidate) -> Self {
        CartLineItem {
            id: candidate.id,
            name: candidate.name,
            unit_price: candidate.unit_price,
            quantity: 1,
            image: candidate.image,
        }
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    fn checked_line_total(&self) -> Option<Money> {
        self.unit_price.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Ledger
// =============================================================================

/// The shopping cart.
///
/// Fields are private so the aggregates can only change through
/// [`recompute`](Self::recompute).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CartSnapshot", try_from = "CartSnapshot")]
pub struct CartLedger {
    items: Vec<CartLineItem>,
    total_item_count: i64,
    total_price: Money,
}

impl CartLedger {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of the candidate.
    ///
    /// ## Behavior
    /// - Id already in cart: quantity increases by 1, the stored name and
    ///   price are kept
    /// - Id not in cart: appended with quantity 1
    ///
    /// Returns `false`, leaving the cart unchanged, for a candidate with a
    /// negative price or when the totals would overflow.
    pub fn add_item(&mut self, candidate: ProductCandidate) -> bool {
        if candidate.unit_price.is_negative() {
            return false;
        }

        match self.items.iter().position(|i| i.id == candidate.id) {
            Some(index) => match self.items[index].quantity.checked_add(1) {
                Some(quantity) => self.set_quantity(index, quantity),
                None => false,
            },
            None => {
                self.items.push(CartLineItem::from_candidate(candidate));
                if self.try_recompute() {
                    true
                } else {
                    self.items.pop();
                    false
                }
            }
        }
    }

    /// Removes the line with the given id.
    ///
    /// Returns whether a line was removed; an absent id is a no-op.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        // A subset of a valid ledger cannot overflow.
        self.try_recompute();
        self.items.len() != initial_len
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`remove_item`](Self::remove_item)
    /// - Id not in cart: no-op (update never creates a line)
    ///
    /// Returns whether a line was changed or removed. A quantity whose totals
    /// would overflow is refused and returns `false`.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        match self.items.iter().position(|i| i.id == id) {
            Some(index) => self.set_quantity(index, quantity),
            None => false,
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.try_recompute();
    }

    /// Sets a line's quantity, restoring the old one if the totals overflow.
    fn set_quantity(&mut self, index: usize, quantity: i64) -> bool {
        let previous = std::mem::replace(&mut self.items[index].quantity, quantity);
        if self.try_recompute() {
            true
        } else {
            self.items[index].quantity = previous;
            false
        }
    }

    /// Re-derives both aggregates from the items.
    ///
    /// On overflow the aggregates are left untouched and `false` is returned.
    fn try_recompute(&mut self) -> bool {
        match totals(&self.items) {
            Some((count, price)) => {
                self.total_item_count = count;
                self.total_price = price;
                true
            }
            None => false,
        }
    }

    /// Line items in first-add order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Looks up a line by product id.
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Sum of quantities over all lines.
    pub fn total_item_count(&self) -> i64 {
        self.total_item_count
    }

    /// Sum of `unit_price × quantity` over all lines.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Captures the persisted shape of the ledger.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_items: self.total_item_count,
            total_price: self.total_price,
        }
    }
}

fn totals(items: &[CartLineItem]) -> Option<(i64, Money)> {
    items.iter().try_fold((0i64, Money::zero()), |(count, price), item| {
        Some((
            count.checked_add(item.quantity)?,
            price.checked_add(item.checked_line_total()?)?,
        ))
    })
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The persisted form of a [`CartLedger`].
///
/// ```json
/// { "items": [{ "id": "1", "name": "Headphones", "price": 9999, "quantity": 2 }],
///   "totalItems": 2, "totalPrice": 19998 }
/// ```
///
/// The stored totals are informational only. Rebuilding a ledger from a
/// snapshot re-derives them from the items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_price: Money,
}

impl From<CartLedger> for CartSnapshot {
    fn from(ledger: CartLedger) -> Self {
        CartSnapshot {
            items: ledger.items,
            total_items: ledger.total_item_count,
            total_price: ledger.total_price,
        }
    }
}

/// Rebuilds a ledger, restoring its invariants on data that was edited
/// outside the ledger: lines with `quantity <= 0` or a negative price are
/// dropped and repeated ids are folded into the first occurrence.
///
/// Fails with [`CoreError::CartOverflow`] when the totals do not fit.
impl TryFrom<CartSnapshot> for CartLedger {
    type Error = CoreError;

    fn try_from(snapshot: CartSnapshot) -> Result<Self, Self::Error> {
        let mut items: Vec<CartLineItem> = Vec::with_capacity(snapshot.items.len());
        for line in snapshot
            .items
            .into_iter()
            .filter(|l| l.quantity > 0 && !l.unit_price.is_negative())
        {
            match items.iter_mut().find(|i| i.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or(CoreError::CartOverflow)?;
                }
                None => items.push(line),
            }
        }

        let mut ledger = CartLedger {
            items,
            ..CartLedger::default()
        };
        if ledger.try_recompute() {
            Ok(ledger)
        } else {
            Err(CoreError::CartOverflow)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, cents: i64) -> ProductCandidate {
        ProductCandidate::new(id, format!("Product {}", id), Money::from_cents(cents))
    }

    fn headphones() -> ProductCandidate {
        ProductCandidate::new("1", "Headphones", Money::from_major_minor(99, 99))
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = CartLedger::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_add_same_id_twice_yields_one_line() {
        let mut cart = CartLedger::new();
        cart.add_item(headphones());
        cart.add_item(headphones());

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.total_price().cents(), 19998);
    }

    #[test]
    fn test_add_keeps_first_add_order() {
        let mut cart = CartLedger::new();
        cart.add_item(candidate("b", 100));
        cart.add_item(candidate("a", 200));
        cart.add_item(candidate("b", 100));
        cart.add_item(candidate("c", 300));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_totals_match_reduction_for_interleaved_adds() {
        let mut cart = CartLedger::new();
        let sequence = [("1", 9999), ("2", 29999), ("1", 9999), ("3", 4999), ("2", 29999), ("1", 9999)];
        for (id, cents) in sequence {
            cart.add_item(candidate(id, cents));
        }

        assert_eq!(cart.total_item_count(), sequence.len() as i64);
        let expected: i64 = sequence.iter().map(|(_, cents)| cents).sum();
        assert_eq!(cart.total_price().cents(), expected);

        let reduced: Money = cart.items().iter().map(CartLineItem::line_total).sum();
        assert_eq!(cart.total_price(), reduced);
    }

    #[test]
    fn test_repeat_add_keeps_original_name_and_price() {
        let mut cart = CartLedger::new();
        cart.add_item(candidate("1", 1000));
        cart.add_item(ProductCandidate::new("1", "Renamed", Money::from_cents(1)));

        let line = cart.get("1").unwrap();
        assert_eq!(line.name, "Product 1");
        assert_eq!(line.unit_price.cents(), 1000);
        assert_eq!(cart.total_price().cents(), 2000);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = CartLedger::new();
        cart.add_item(headphones());

        assert!(cart.update_quantity("1", 5));
        assert_eq!(cart.total_item_count(), 5);
        assert_eq!(cart.total_price().cents(), 49995);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        for quantity in [0, -5] {
            let mut updated = CartLedger::new();
            updated.add_item(candidate("1", 500));
            updated.add_item(candidate("2", 700));

            let mut removed = updated.clone();

            assert!(updated.update_quantity("1", quantity));
            assert!(removed.remove_item("1"));

            assert_eq!(updated, removed);
            assert!(updated.get("1").is_none());
            assert_eq!(updated.total_price().cents(), 700);
        }
    }

    #[test]
    fn test_update_quantity_absent_id_is_noop() {
        let mut cart = CartLedger::new();
        cart.add_item(candidate("1", 500));
        let before = cart.clone();

        assert!(!cart.update_quantity("missing", 3));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = CartLedger::new();
        cart.add_item(candidate("1", 500));
        let before = cart.clone();

        assert!(!cart.remove_item("missing"));
        assert!(!cart.remove_item("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_always_zeroes() {
        let mut cart = CartLedger::new();
        cart.clear();
        assert!(cart.is_empty());

        cart.add_item(candidate("1", 500));
        cart.add_item(candidate("2", 700));
        cart.update_quantity("2", 4);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_headphones_scenario() {
        let mut cart = CartLedger::new();
        cart.add_item(headphones());
        cart.add_item(headphones());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.total_price().to_string(), "$199.98");

        cart.update_quantity("1", 5);
        assert_eq!(cart.total_price().to_string(), "$499.95");

        cart.remove_item("1");
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut cart = CartLedger::new();
        cart.add_item(headphones().with_image("🎧"));
        cart.add_item(candidate("2", 2999));
        cart.update_quantity("2", 3);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_snapshot_uses_persisted_field_names() {
        let mut cart = CartLedger::new();
        cart.add_item(headphones());

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["totalPrice"], 9999);
        assert_eq!(json["items"][0]["price"], 9999);
        assert_eq!(json["items"][0]["quantity"], 1);
    }

    #[test]
    fn test_stored_totals_are_rederived() {
        let json = r#"{
            "items": [{"id": "1", "name": "Headphones", "price": 9999, "quantity": 2}],
            "totalItems": 40,
            "totalPrice": 1
        }"#;

        let cart: CartLedger = serde_json::from_str(json).unwrap();
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.total_price().cents(), 19998);
    }

    #[test]
    fn test_snapshot_without_totals_loads() {
        let json = r#"{"items": [{"id": "1", "name": "Mug", "price": 1999, "quantity": 1}]}"#;
        let cart: CartLedger = serde_json::from_str(json).unwrap();
        assert_eq!(cart.total_price().cents(), 1999);
    }

    #[test]
    fn test_snapshot_repairs_invalid_lines() {
        let snapshot = CartSnapshot {
            items: vec![
                CartLineItem {
                    id: "1".into(),
                    name: "A".into(),
                    unit_price: Money::from_cents(100),
                    quantity: 2,
                    image: None,
                },
                CartLineItem {
                    id: "2".into(),
                    name: "B".into(),
                    unit_price: Money::from_cents(500),
                    quantity: 0,
                    image: None,
                },
                CartLineItem {
                    id: "1".into(),
                    name: "A".into(),
                    unit_price: Money::from_cents(100),
                    quantity: 3,
                    image: None,
                },
            ],
            total_items: 0,
            total_price: Money::zero(),
        };

        let cart = CartLedger::try_from(snapshot).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get("1").unwrap().quantity, 5);
        assert_eq!(cart.total_price().cents(), 500);
    }

    #[test]
    fn test_overflowing_quantity_is_refused() {
        let mut cart = CartLedger::new();
        cart.add_item(headphones());
        let before = cart.clone();

        assert!(!cart.update_quantity("1", i64::MAX / 2));
        assert_eq!(cart, before);

        assert!(cart.update_quantity("1", 3));
        assert_eq!(cart.total_price().cents(), 29997);
    }

    #[test]
    fn test_repeat_add_at_max_quantity_is_refused() {
        let mut cart = CartLedger::new();
        cart.add_item(candidate("free", 0));
        assert!(cart.update_quantity("free", i64::MAX));

        assert!(!cart.add_item(candidate("free", 0)));
        assert_eq!(cart.total_item_count(), i64::MAX);

        assert!(!cart.add_item(candidate("other", 0)));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_negative_price_is_refused() {
        let mut cart = CartLedger::new();
        assert!(!cart.add_item(candidate("refund", -500)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_overflowing_snapshot_fails_to_deserialize() {
        let json = r#"{"items":[{"id":"1","name":"H","price":9999,"quantity":4000000000000000}]}"#;
        assert!(serde_json::from_str::<CartLedger>(json).is_err());

        let merged = r#"{"items":[
            {"id":"1","name":"H","price":0,"quantity":9223372036854775807},
            {"id":"1","name":"H","price":0,"quantity":1}
        ]}"#;
        assert!(serde_json::from_str::<CartLedger>(merged).is_err());
    }

    #[test]
    fn test_snapshot_drops_negative_prices() {
        let json = r#"{"items":[
            {"id":"1","name":"Mug","price":1999,"quantity":1},
            {"id":"2","name":"Refund","price":-500,"quantity":1}
        ]}"#;
        let cart: CartLedger = serde_json::from_str(json).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_price().cents(), 1999);
    }
}
