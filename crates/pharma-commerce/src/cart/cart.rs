//! Cart and line item types.

use crate::cart::{CartPricing, LineItemPricing};
use crate::checkout::OrderItem;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// The product snapshot taken when something is put in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Product name at add time.
    pub product_name: String,
    /// Unit price at add time, in the smallest currency unit.
    pub unit_price: i64,
}

impl CartItem {
    /// Create a new product snapshot.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        unit_price: i64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
        }
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product being ordered.
    pub product_id: ProductId,
    /// Product name (denormalized for display, never re-synced).
    pub product_name: String,
    /// Unit price snapshot.
    pub unit_price: i64,
    /// Quantity, always at least 1.
    pub quantity: i64,
}

impl CartLineItem {
    /// Line subtotal, saturating at `i64::MAX`.
    pub fn subtotal(&self) -> i64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// A shopping cart.
///
/// Holds at most one line item per product, in insertion order. The cart is
/// pure state; persistence is handled by the store that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// The quantity is coerced to at least 1. Adding a product that is
    /// already present increases its quantity instead of adding a new line.
    pub fn add_item(&mut self, item: CartItem, quantity: i64) {
        let quantity = quantity.max(1);

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartLineItem {
            product_id: item.product_id,
            product_name: item.product_name,
            unit_price: item.unit_price,
            quantity,
        });
    }

    /// Add a product with a quantity typed into a free-form input.
    ///
    /// Fractional values are floored; NaN and anything below 1 become 1.
    pub fn add_item_fractional(&mut self, item: CartItem, quantity: f64) {
        self.add_item(item, coerce_quantity(quantity));
    }

    /// Remove a product. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() < len_before
    }

    /// Set a product's quantity.
    ///
    /// A quantity of zero or below removes the item. Positive values are
    /// stored as given. Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across all line items.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of `unit_price * quantity`, saturating at `i64::MAX`.
    pub fn total_amount(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.subtotal()))
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line item by product.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Calculate a checked pricing breakdown in the given currency.
    pub fn pricing(&self, currency: Currency) -> Result<CartPricing, CommerceError> {
        let line_items = self
            .items
            .iter()
            .map(|item| {
                let unit_price = Money::new(item.unit_price, currency);
                let subtotal = unit_price
                    .try_multiply(item.quantity)
                    .ok_or(CommerceError::Overflow)?;
                Ok(LineItemPricing {
                    product_id: item.product_id.clone(),
                    unit_price,
                    quantity: item.quantity,
                    subtotal,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let total = Money::try_sum(line_items.iter().map(|l| &l.subtotal), currency)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            total_items: self.total_items(),
            total,
            line_items,
        })
    }

    /// Convert the cart into the item list submitted with an order.
    pub fn to_order_items(&self) -> Vec<OrderItem> {
        self.items
            .iter()
            .map(|i| OrderItem {
                product_id: i.product_id.clone(),
                quantity: i.quantity,
            })
            .collect()
    }
}

fn coerce_quantity(quantity: f64) -> i64 {
    if quantity.is_nan() || quantity < 1.0 {
        return 1;
    }
    // `as` saturates for out-of-range floats.
    quantity.floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64) -> CartItem {
        CartItem::new(id, format!("Product {id}"), price)
    }

    #[test]
    fn test_add_same_item_accumulates() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 2);
        cart.add_item(item("A", 100), 3);

        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.get_item(&"A".into()).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_coerces_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 0);
        cart.add_item(item("B", 100), -1);

        assert_eq!(cart.get_item(&"A".into()).unwrap().quantity, 1);
        assert_eq!(cart.get_item(&"B".into()).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_fractional_quantity() {
        let mut cart = Cart::new();
        cart.add_item_fractional(item("A", 10), 2.9);
        cart.add_item_fractional(item("B", 10), 0.4);
        cart.add_item_fractional(item("C", 10), f64::NAN);

        assert_eq!(cart.get_item(&"A".into()).unwrap().quantity, 2);
        assert_eq!(cart.get_item(&"B".into()).unwrap().quantity, 1);
        assert_eq!(cart.get_item(&"C".into()).unwrap().quantity, 1);
    }

    #[test]
    fn test_snapshot_is_kept_on_re_add() {
        let mut cart = Cart::new();
        cart.add_item(CartItem::new("A", "Old name", 100), 1);
        cart.add_item(CartItem::new("A", "New name", 120), 1);

        let line = cart.get_item(&"A".into()).unwrap();
        assert_eq!(line.product_name, "Old name");
        assert_eq!(line.unit_price, 100);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 1);
        cart.add_item(item("B", 100), 1);
        cart.add_item(item("C", 100), 1);

        assert!(cart.update_quantity(&"A".into(), 4));
        assert_eq!(cart.get_item(&"A".into()).unwrap().quantity, 4);

        assert!(cart.update_quantity(&"B".into(), 0));
        assert!(cart.get_item(&"B".into()).is_none());

        assert!(cart.update_quantity(&"C".into(), -5));
        assert!(cart.get_item(&"C".into()).is_none());
    }

    #[test]
    fn test_update_quantity_has_no_upper_clamp() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 1), 1);
        cart.update_quantity(&"A".into(), 1_000_000);
        assert_eq!(cart.total_items(), 1_000_000);
    }

    #[test]
    fn test_update_missing_item_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.update_quantity(&"missing".into(), 3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 1);
        assert!(!cart.remove_item(&"B".into()));
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 2);
        cart.add_item(item("B", 50), 1);

        assert_eq!(cart.total_amount(), 250);
        assert_eq!(cart.total_items(), 3);

        cart.remove_item(&"B".into());
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_amount(), 200);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(item("B", 1), 1);
        cart.add_item(item("A", 1), 1);
        cart.add_item(item("B", 1), 1);

        let ids: Vec<&str> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_pricing() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 2);
        cart.add_item(item("B", 50), 1);

        let pricing = cart.pricing(Currency::NPR).unwrap();
        assert_eq!(pricing.total.amount, 250);
        assert_eq!(pricing.total_items, 3);
        assert_eq!(pricing.line_items[0].subtotal.amount, 200);
    }

    #[test]
    fn test_pricing_overflow() {
        let mut cart = Cart::new();
        cart.add_item(item("A", i64::MAX), 2);
        assert_eq!(cart.pricing(Currency::NPR), Err(CommerceError::Overflow));
        assert_eq!(cart.total_amount(), i64::MAX);
    }

    #[test]
    fn test_to_order_items() {
        let mut cart = Cart::new();
        cart.add_item(item("A", 100), 2);
        let order_items = cart.to_order_items();
        assert_eq!(order_items.len(), 1);
        assert_eq!(order_items[0].product_id.as_str(), "A");
        assert_eq!(order_items[0].quantity, 2);
    }
}
