//! Read operations.
//!
//! | Query | Key | Errors | Retries |
//! |---|---|---|---|
//! | products | `products` | propagate | default |
//! | hot products | `hotProducts` | propagate | default |
//! | product by id | `product:<id>` | become `None` | default |
//! | categories | `categories` | propagate | default |
//! | own profile | `currentUserProfile` | propagate | none |
//! | own orders | `orderHistory` | propagate | default |
//! | all orders | `adminOrders` | propagate | default |
//! | am I admin | `isAdmin` | become `false` | none |
//! | admin session active | `adminSessionActive` | become `false` | none |
//! | order customer | `orderCustomer:<id>` | propagate | none |
//!
//! Queries that depend on the caller's identity or admin state never retry,
//! so an authorization failure is not mistaken for a transient one.

use pharma_commerce::prelude::*;

use crate::client::QueryResult;
use crate::{QueryKey, RetryPolicy, SyncClient, SyncError};

impl SyncClient {
    pub async fn products(&self) -> Result<QueryResult<Vec<Product>>, SyncError> {
        self.query(QueryKey::products(), &self.retry, |backend| async move {
            backend.get_all_products().await
        })
        .await
    }

    pub async fn hot_products(&self) -> Result<QueryResult<Vec<Product>>, SyncError> {
        self.query(QueryKey::hot_products(), &self.retry, |backend| async move {
            backend.get_hot_products().await
        })
        .await
    }

    /// A single product. Missing products, and any other failure, resolve
    /// to `None`. A blank id disables the query.
    pub async fn product(&self, id: &ProductId) -> Result<QueryResult<Option<Product>>, SyncError> {
        if id.is_blank() {
            return Ok(QueryResult::disabled());
        }

        self.query(QueryKey::product(id), &self.retry, |backend| {
            let id = id.clone();
            async move {
                match backend.get_product(&id).await {
                    Ok(product) => Ok(Some(product)),
                    Err(e) => {
                        tracing::debug!(product = %id, error = %e, "product lookup failed");
                        Ok(None)
                    }
                }
            }
        })
        .await
    }

    pub async fn categories(&self) -> Result<QueryResult<Vec<Category>>, SyncError> {
        self.query(QueryKey::categories(), &self.retry, |backend| async move {
            backend.get_all_categories().await
        })
        .await
    }

    /// The caller's profile, `None` until one is saved.
    pub async fn current_user_profile(
        &self,
    ) -> Result<QueryResult<Option<UserProfile>>, SyncError> {
        self.query(
            QueryKey::current_user_profile(),
            &RetryPolicy::none(),
            |backend| async move { backend.get_caller_user_profile().await },
        )
        .await
    }

    pub async fn order_history(&self) -> Result<QueryResult<Vec<Order>>, SyncError> {
        self.query(QueryKey::order_history(), &self.retry, |backend| async move {
            backend.get_order_history().await
        })
        .await
    }

    /// Every order, for the admin console.
    pub async fn admin_orders(&self) -> Result<QueryResult<Vec<Order>>, SyncError> {
        self.query(QueryKey::admin_orders(), &self.retry, |backend| async move {
            backend.get_all_orders().await
        })
        .await
    }

    /// Whether the caller holds the admin role. Failures read as `false`.
    pub async fn is_admin(&self) -> Result<QueryResult<bool>, SyncError> {
        self.query(QueryKey::is_admin(), &RetryPolicy::none(), |backend| async move {
            Ok(backend.is_caller_admin().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "admin role check failed, assuming not admin");
                false
            }))
        })
        .await
    }

    /// Whether an admin session is open. Failures read as `false`.
    pub async fn is_admin_session_active(&self) -> Result<QueryResult<bool>, SyncError> {
        self.query(
            QueryKey::admin_session_active(),
            &RetryPolicy::none(),
            |backend| async move {
                Ok(backend.is_admin_session_active().await.unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "admin session check failed, assuming inactive");
                    false
                }))
            },
        )
        .await
    }

    /// Who placed an order. A blank id disables the query.
    pub async fn order_customer(
        &self,
        order_id: &OrderId,
    ) -> Result<QueryResult<Option<CustomerDetails>>, SyncError> {
        if order_id.is_blank() {
            return Ok(QueryResult::disabled());
        }

        self.query(
            QueryKey::order_customer(order_id),
            &RetryPolicy::none(),
            |backend| {
                let order_id = order_id.clone();
                async move { backend.get_order_customer_details(&order_id).await.map(Some) }
            },
        )
        .await
    }
}
