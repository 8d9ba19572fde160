//! The backend collaborator interface.
//!
//! Every durable fact lives behind this trait. The client never re-checks
//! what the backend decides: authorization, upserts and status transitions
//! are taken as reported.

use async_trait::async_trait;
use pharma_commerce::prelude::*;

use crate::BackendError;

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Typed remote interface of the storefront backend.
#[async_trait]
pub trait Backend: Send + Sync {
    // Catalog

    async fn get_all_products(&self) -> BackendResult<Vec<Product>>;

    async fn get_hot_products(&self) -> BackendResult<Vec<Product>>;

    /// Fails with [`BackendError::NotFound`] for an unknown id.
    async fn get_product(&self, id: &ProductId) -> BackendResult<Product>;

    async fn get_all_categories(&self) -> BackendResult<Vec<Category>>;

    async fn add_category(&self, id: &CategoryId, name: &str) -> BackendResult<()>;

    /// Create or replace a product.
    async fn update_product(&self, update: ProductUpdate) -> BackendResult<()>;

    async fn mark_product_as_hot(&self, id: &ProductId, is_hot: bool) -> BackendResult<()>;

    async fn delete_product(&self, id: &ProductId) -> BackendResult<()>;

    // Caller profile and orders

    /// `None` until the caller saves a profile.
    async fn get_caller_user_profile(&self) -> BackendResult<Option<UserProfile>>;

    async fn save_caller_user_profile(&self, profile: UserProfile) -> BackendResult<()>;

    async fn get_order_history(&self) -> BackendResult<Vec<Order>>;

    async fn submit_order(&self, items: Vec<OrderItem>) -> BackendResult<()>;

    // Admin

    async fn get_all_orders(&self) -> BackendResult<Vec<Order>>;

    async fn update_order_status(&self, order_id: &OrderId, status: &OrderStatus)
        -> BackendResult<()>;

    async fn get_order_customer_details(&self, order_id: &OrderId)
        -> BackendResult<CustomerDetails>;

    async fn is_caller_admin(&self) -> BackendResult<bool>;

    async fn is_admin_session_active(&self) -> BackendResult<bool>;

    /// `Ok(false)` means the call went through and the credentials were refused.
    async fn admin_login(&self, email: &str, password: &str) -> BackendResult<bool>;

    async fn admin_logout(&self) -> BackendResult<()>;
}
