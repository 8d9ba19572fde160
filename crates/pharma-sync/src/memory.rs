//! In-process backend for tests, demos and offline development.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pharma_commerce::prelude::*;

use crate::backend::{Backend, BackendResult};
use crate::BackendError;

struct State {
    products: BTreeMap<ProductId, Product>,
    categories: BTreeMap<CategoryId, Category>,
    profiles: HashMap<Principal, UserProfile>,
    orders: Vec<Order>,
    next_order_id: u64,
    caller: Principal,
    admins: HashSet<Principal>,
    admin_credentials: Option<(String, String)>,
    admin_session_active: bool,
}

#[derive(Default)]
struct Calls {
    counts: HashMap<&'static str, u32>,
    failures: HashMap<&'static str, VecDeque<BackendError>>,
}

/// A [`Backend`] held entirely in memory.
///
/// Admin operations require the caller to hold the admin role or an open
/// admin session, as the real service does. Every call is counted by
/// operation name, and failures can be queued per operation.
///
/// ```rust
/// use pharma_sync::{Backend, InMemoryBackend};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = InMemoryBackend::new().with_admin_credentials("admin@example.com", "s3cret");
/// assert!(!backend.admin_login("admin@example.com", "wrong").await.unwrap());
/// assert!(backend.admin_login("admin@example.com", "s3cret").await.unwrap());
/// assert_eq!(backend.calls("admin_login"), 2);
/// # }
/// ```
pub struct InMemoryBackend {
    state: Mutex<State>,
    calls: Mutex<Calls>,
}

impl InMemoryBackend {
    /// An empty backend. The caller is `local-user` with no admin role.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                products: BTreeMap::new(),
                categories: BTreeMap::new(),
                profiles: HashMap::new(),
                orders: Vec::new(),
                next_order_id: 0,
                caller: Principal::new("local-user"),
                admins: HashSet::new(),
                admin_credentials: None,
                admin_session_active: false,
            }),
            calls: Mutex::default(),
        }
    }

    pub fn with_category(self, category: Category) -> Self {
        self.state()
            .categories
            .insert(category.id.clone(), category);
        self
    }

    pub fn with_product(self, product: Product) -> Self {
        {
            let mut state = self.state();
            state
                .categories
                .entry(product.category.id.clone())
                .or_insert_with(|| product.category.clone());
            state.products.insert(product.id.clone(), product);
        }
        self
    }

    pub fn with_admin_credentials(self, email: &str, password: &str) -> Self {
        self.state().admin_credentials = Some((email.to_string(), password.to_string()));
        self
    }

    /// Give `principal` the admin role.
    pub fn with_admin(self, principal: impl Into<Principal>) -> Self {
        self.state().admins.insert(principal.into());
        self
    }

    /// Switch the identity subsequent calls are made as.
    pub fn set_caller(&self, principal: impl Into<Principal>) {
        self.state().caller = principal.into();
    }

    pub fn caller(&self) -> Principal {
        self.state().caller.clone()
    }

    /// Make the next call to `operation` fail with `error`.
    ///
    /// Queued failures are consumed in order, one per call.
    pub fn fail_next(&self, operation: &'static str, error: BackendError) {
        self.call_log()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// How many times `operation` has been called, failed calls included.
    pub fn calls(&self, operation: &str) -> u32 {
        self.call_log().counts.get(operation).copied().unwrap_or(0)
    }

    /// Snapshot of every stored order.
    pub fn orders(&self) -> Vec<Order> {
        self.state().orders.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn call_log(&self) -> MutexGuard<'_, Calls> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a call and pop any failure queued for it.
    fn enter(&self, operation: &'static str) -> BackendResult<()> {
        let mut calls = self.call_log();
        *calls.counts.entry(operation).or_default() += 1;
        match calls.failures.get_mut(operation).and_then(VecDeque::pop_front) {
            Some(error) => {
                tracing::debug!(operation, error = %error, "injected backend failure");
                Err(error)
            }
            None => Ok(()),
        }
    }

    /// Enter an admin-only call.
    fn enter_admin(&self, operation: &'static str) -> BackendResult<MutexGuard<'_, State>> {
        self.enter(operation)?;
        let state = self.state();
        if state.admin_session_active || state.admins.contains(&state.caller) {
            Ok(state)
        } else {
            Err(BackendError::Unauthorized(format!(
                "Only admins can call {}",
                operation
            )))
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn get_all_products(&self) -> BackendResult<Vec<Product>> {
        self.enter("get_all_products")?;
        Ok(self.state().products.values().cloned().collect())
    }

    async fn get_hot_products(&self) -> BackendResult<Vec<Product>> {
        self.enter("get_hot_products")?;
        Ok(self
            .state()
            .products
            .values()
            .filter(|p| p.is_hot)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: &ProductId) -> BackendResult<Product> {
        self.enter("get_product")?;
        self.state()
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("product {}", id)))
    }

    async fn get_all_categories(&self) -> BackendResult<Vec<Category>> {
        self.enter("get_all_categories")?;
        Ok(self.state().categories.values().cloned().collect())
    }

    async fn add_category(&self, id: &CategoryId, name: &str) -> BackendResult<()> {
        let mut state = self.enter_admin("add_category")?;
        state
            .categories
            .insert(id.clone(), Category::new(id.clone(), name));
        Ok(())
    }

    async fn update_product(&self, update: ProductUpdate) -> BackendResult<()> {
        let mut state = self.enter_admin("update_product")?;
        let category = state
            .categories
            .get(&update.category_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("category {}", update.category_id)))?;

        let product = Product {
            id: update.id,
            name: update.name,
            description: update.description,
            net_rate: update.net_rate,
            mrp: update.mrp,
            photo: update.photo,
            category,
            bonus_offer: update.bonus_offer,
            is_hot: update.is_hot,
        };
        state.products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn mark_product_as_hot(&self, id: &ProductId, is_hot: bool) -> BackendResult<()> {
        let mut state = self.enter_admin("mark_product_as_hot")?;
        let product = state
            .products
            .get_mut(id)
            .ok_or_else(|| BackendError::NotFound(format!("product {}", id)))?;
        product.is_hot = is_hot;
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> BackendResult<()> {
        let mut state = self.enter_admin("delete_product")?;
        state
            .products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("product {}", id)))
    }

    async fn get_caller_user_profile(&self) -> BackendResult<Option<UserProfile>> {
        self.enter("get_caller_user_profile")?;
        let state = self.state();
        Ok(state.profiles.get(&state.caller).cloned())
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> BackendResult<()> {
        self.enter("save_caller_user_profile")?;
        let mut state = self.state();
        let caller = state.caller.clone();
        state.profiles.insert(caller, profile);
        Ok(())
    }

    async fn get_order_history(&self) -> BackendResult<Vec<Order>> {
        self.enter("get_order_history")?;
        let state = self.state();
        Ok(state
            .orders
            .iter()
            .filter(|o| o.customer == state.caller)
            .cloned()
            .collect())
    }

    async fn submit_order(&self, items: Vec<OrderItem>) -> BackendResult<()> {
        self.enter("submit_order")?;
        if items.is_empty() {
            return Err(BackendError::Rejected(
                "Order must contain at least one item".to_string(),
            ));
        }

        let mut state = self.state();
        state.next_order_id += 1;
        let order = Order {
            id: OrderId::new(state.next_order_id.to_string()),
            status: OrderStatus::Pending,
            customer: state.caller.clone(),
            items,
        };
        state.orders.push(order);
        Ok(())
    }

    async fn get_all_orders(&self) -> BackendResult<Vec<Order>> {
        let state = self.enter_admin("get_all_orders")?;
        Ok(state.orders.clone())
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: &OrderStatus,
    ) -> BackendResult<()> {
        let mut state = self.enter_admin("update_order_status")?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| BackendError::NotFound(format!("order {}", order_id)))?;
        order.status = status.clone();
        Ok(())
    }

    async fn get_order_customer_details(
        &self,
        order_id: &OrderId,
    ) -> BackendResult<CustomerDetails> {
        let state = self.enter_admin("get_order_customer_details")?;
        let order = state
            .orders
            .iter()
            .find(|o| &o.id == order_id)
            .ok_or_else(|| BackendError::NotFound(format!("order {}", order_id)))?;
        Ok(CustomerDetails {
            customer: order.customer.clone(),
            profile: state.profiles.get(&order.customer).cloned(),
        })
    }

    async fn is_caller_admin(&self) -> BackendResult<bool> {
        self.enter("is_caller_admin")?;
        let state = self.state();
        Ok(state.admins.contains(&state.caller))
    }

    async fn is_admin_session_active(&self) -> BackendResult<bool> {
        self.enter("is_admin_session_active")?;
        Ok(self.state().admin_session_active)
    }

    async fn admin_login(&self, email: &str, password: &str) -> BackendResult<bool> {
        self.enter("admin_login")?;
        let mut state = self.state();
        let accepted = state
            .admin_credentials
            .as_ref()
            .is_some_and(|(e, p)| e == email && p == password);
        if accepted {
            state.admin_session_active = true;
        }
        Ok(accepted)
    }

    async fn admin_logout(&self) -> BackendResult<()> {
        self.enter("admin_logout")?;
        self.state().admin_session_active = false;
        Ok(())
    }
}
