//! Cart pricing calculations.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart, as shown on the cart and checkout pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of quantities.
    pub total_items: i64,
    /// Sum of line subtotals.
    pub total: Money,
    /// Per-line breakdown, in cart order.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Check if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Product on this line.
    pub product_id: ProductId,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// `unit_price * quantity`.
    pub subtotal: Money,
}
