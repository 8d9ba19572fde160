//! Client-durable storage for the Hitech Pharma storefront.
//!
//! Provides a small key-value abstraction with automatic JSON serialization,
//! and the two pieces of state the storefront keeps on the client:
//!
//! - the shopping cart, under [`CART_STORAGE_KEY`]
//! - the admin-session UI hint, under [`ADMIN_SESSION_KEY`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pharma_commerce::cart::CartItem;
//! use pharma_store::{CartStore, MemoryStore};
//!
//! let storage = Arc::new(MemoryStore::new());
//! let mut cart = CartStore::open(storage.clone());
//! cart.add_item(CartItem::new("amox-500", "Amoxicillin 500mg", 100), 2);
//!
//! // A second store over the same storage sees the persisted cart.
//! let reloaded = CartStore::open(storage);
//! assert_eq!(reloaded.total_items(), 2);
//! ```

mod admin_session;
mod cart_store;
mod error;
mod kv;
mod persist;

pub use admin_session::{AdminSessionHint, AdminSessionMarker, ADMIN_SESSION_KEY};
pub use cart_store::{CartStore, CART_STORAGE_KEY};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreExt};
pub use persist::{Persisted, STORAGE_VERSION};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AdminSessionHint, CartStore, FileStore, KeyValueStore, MemoryStore, StoreError, StoreExt,
    };
}
