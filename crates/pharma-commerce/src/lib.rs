//! Domain types and client-side logic for the Hitech Pharma storefront.
//!
//! This crate holds everything the storefront computes locally, without
//! talking to the backend:
//!
//! - **Catalog**: Products, categories and the listing filters
//! - **Cart**: Line items, quantity rules, derived totals
//! - **Checkout**: Orders, order status, user profiles, form validation
//!
//! # Example
//!
//! ```rust
//! use pharma_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartItem::new("amox-500", "Amoxicillin 500mg", 100), 2);
//! cart.add_item(CartItem::new("para-650", "Paracetamol 650mg", 50), 1);
//!
//! assert_eq!(cart.total_items(), 3);
//! assert_eq!(cart.total_amount(), 250);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Category, PhotoRef, Product, ProductFilter, ProductUpdate};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartLineItem, CartPricing, LineItemPricing};

    // Checkout
    pub use crate::checkout::{
        pending_order_count, sort_orders_newest_first, CategoryForm, CustomerDetails, Order,
        OrderItem, OrderStatus, ProductForm, ProfileForm, StatusForm, UserProfile,
    };
}
