//! The persisted shopping cart.

use std::sync::Arc;

use pharma_commerce::cart::{Cart, CartItem, CartLineItem, CartPricing};
use pharma_commerce::checkout::OrderItem;
use pharma_commerce::{CommerceError, Currency, ProductId};

use crate::{KeyValueStore, Persisted};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "hitech-pharma-cart";

/// Cart container owned by the application root.
///
/// Wraps a [`Cart`] and writes it back to client storage after every change.
/// Storage failures are logged and otherwise ignored: the in-memory cart
/// stays authoritative for the session.
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStore {
    /// Load the cart persisted under [`CART_STORAGE_KEY`].
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// Load the cart persisted under a custom key.
    ///
    /// A missing, corrupt or outdated entry yields an empty cart.
    pub fn with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match Persisted::<Cart>::load(storage.as_ref(), &key) {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to load cart, starting empty");
                Cart::new()
            }
        };

        tracing::debug!(key = %key, items = cart.unique_item_count(), "cart loaded");
        Self { cart, storage, key }
    }

    /// Storage key this cart writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add a product; see [`Cart::add_item`].
    pub fn add_item(&mut self, item: CartItem, quantity: i64) {
        self.cart.add_item(item, quantity);
        self.persist();
    }

    /// Add a product with a fractional quantity; see [`Cart::add_item_fractional`].
    pub fn add_item_fractional(&mut self, item: CartItem, quantity: f64) {
        self.cart.add_item_fractional(item, quantity);
        self.persist();
    }

    /// Remove a product. Absent products are a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        if self.cart.remove_item(product_id) {
            self.persist();
        }
    }

    /// Set a product's quantity; zero or below removes it.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if self.cart.update_quantity(product_id, quantity) {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.cart.items
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_items(&self) -> i64 {
        self.cart.total_items()
    }

    pub fn total_amount(&self) -> i64 {
        self.cart.total_amount()
    }

    pub fn pricing(&self, currency: Currency) -> Result<CartPricing, CommerceError> {
        self.cart.pricing(currency)
    }

    pub fn to_order_items(&self) -> Vec<OrderItem> {
        self.cart.to_order_items()
    }

    fn persist(&self) {
        if let Err(e) = Persisted::save(self.storage.as_ref(), &self.key, self.cart.clone()) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStore, MemoryStore, StoreError, StoreExt};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_raw(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::StoreError("unavailable".into()))
        }

        fn set_raw(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
            Err(StoreError::StoreError("quota exceeded".into()))
        }

        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::StoreError("unavailable".into()))
        }

        fn keys(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn item(id: &str, price: i64) -> CartItem {
        CartItem::new(id, format!("Product {}", id), price)
    }

    #[test]
    fn test_changes_are_persisted() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(storage.clone());
        store.add_item(item("a", 50), 2);
        store.add_item(item("b", 150), 1);
        store.update_quantity(&ProductId::new("a"), 5);

        let reloaded = CartStore::open(storage);
        assert_eq!(reloaded.total_items(), 6);
        assert_eq!(reloaded.total_amount(), 400);
        assert_eq!(reloaded.items()[0].product_id.as_str(), "a");
    }

    #[test]
    fn test_persisted_under_fixed_key() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(storage.clone());
        store.add_item(item("a", 50), 1);

        assert!(storage.exists(CART_STORAGE_KEY).unwrap());
    }

    #[test]
    fn test_clear_cart_persists_empty() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(storage.clone());
        store.add_item(item("a", 50), 3);
        store.clear_cart();

        assert!(CartStore::open(storage).is_empty());
    }

    #[test]
    fn test_corrupt_entry_loads_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set_raw(CART_STORAGE_KEY, b"not json").unwrap();

        let store = CartStore::open(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_outdated_entry_loads_empty() {
        let storage = Arc::new(MemoryStore::new());
        let mut cart = Cart::new();
        cart.add_item(item("a", 50), 1);
        storage
            .set(
                CART_STORAGE_KEY,
                &Persisted {
                    state: cart,
                    version: crate::STORAGE_VERSION + 1,
                    updated_at: 0,
                },
            )
            .unwrap();

        assert!(CartStore::open(storage).is_empty());
    }

    #[test]
    fn test_storage_failure_is_not_surfaced() {
        let mut store = CartStore::open(Arc::new(FailingStore));
        store.add_item(item("a", 100), 2);
        store.add_item(item("a", 100), 3);

        assert_eq!(store.total_items(), 5);
        assert_eq!(store.total_amount(), 500);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = CartStore::open(Arc::new(MemoryStore::new()));
        store.add_item(item("a", 100), 1);
        store.remove_item(&ProductId::new("zzz"));
        assert_eq!(store.total_items(), 1);
    }

    #[test]
    fn test_custom_key_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut store = CartStore::with_key(storage.clone(), "branch-cart");
        store.add_item_fractional(item("a", 100), 2.7);

        assert_eq!(store.key(), "branch-cart");
        assert!(dir.path().join("branch-cart.json").exists());
        assert_eq!(CartStore::with_key(storage, "branch-cart").total_items(), 2);
    }
}
