//! Shopping cart module.
//!
//! Contains the cart, its line items and the derived pricing.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, CartLineItem};
pub use pricing::{CartPricing, LineItemPricing};
