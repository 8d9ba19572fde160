//! Checkout module.
//!
//! Orders as the backend reports them, customer profiles, and the form
//! validation run before any mutation is sent.

mod order;
mod profile;
mod validation;

pub use order::{
    pending_order_count, sort_orders_newest_first, CustomerDetails, Order, OrderItem, OrderStatus,
};
pub use profile::UserProfile;
pub use validation::{CategoryForm, ProductForm, ProfileForm, StatusForm};
