//! Write operations and the queries each one invalidates.

use pharma_commerce::prelude::*;
use pharma_store::CartStore;

use crate::{AdminSessionEvent, AdminSessionState, QueryKey, SyncClient, SyncError};

/// Every state-changing backend call the client makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    SaveProfile,
    SubmitOrder,
    AddCategory,
    UpdateProduct,
    MarkProductHot,
    DeleteProduct,
    UpdateOrderStatus,
    AdminLogin,
    AdminLogout,
}

impl Mutation {
    pub fn name(self) -> &'static str {
        match self {
            Self::SaveProfile => "save_caller_user_profile",
            Self::SubmitOrder => "submit_order",
            Self::AddCategory => "add_category",
            Self::UpdateProduct => "update_product",
            Self::MarkProductHot => "mark_product_as_hot",
            Self::DeleteProduct => "delete_product",
            Self::UpdateOrderStatus => "update_order_status",
            Self::AdminLogin => "admin_login",
            Self::AdminLogout => "admin_logout",
        }
    }

    /// Query prefixes marked stale after a successful call.
    ///
    /// Logout does not list the session flag: it is written to `false`
    /// directly by the session state machine.
    pub fn invalidates(self) -> Vec<QueryKey> {
        match self {
            Self::SaveProfile => vec![QueryKey::current_user_profile()],
            Self::SubmitOrder => vec![QueryKey::order_history(), QueryKey::admin_orders()],
            Self::AddCategory => vec![QueryKey::categories()],
            Self::UpdateProduct => vec![
                QueryKey::products(),
                QueryKey::any_product(),
                QueryKey::hot_products(),
            ],
            Self::MarkProductHot | Self::DeleteProduct => {
                vec![QueryKey::products(), QueryKey::hot_products()]
            }
            Self::UpdateOrderStatus => vec![QueryKey::admin_orders()],
            Self::AdminLogin => vec![QueryKey::admin_session_active(), QueryKey::admin_orders()],
            Self::AdminLogout => vec![QueryKey::admin_orders()],
        }
    }
}

impl SyncClient {
    pub async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), SyncError> {
        let m = Mutation::SaveProfile;
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.save_caller_user_profile(profile).await
        })
        .await
    }

    pub async fn submit_order(&self, items: Vec<OrderItem>) -> Result<(), SyncError> {
        let m = Mutation::SubmitOrder;
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.submit_order(items).await
        })
        .await
    }

    pub async fn add_category(&self, category: Category) -> Result<(), SyncError> {
        let m = Mutation::AddCategory;
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.add_category(&category.id, &category.name).await
        })
        .await
    }

    /// Create or replace a product.
    pub async fn update_product(&self, update: ProductUpdate) -> Result<(), SyncError> {
        let m = Mutation::UpdateProduct;
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.update_product(update).await
        })
        .await
    }

    pub async fn mark_product_as_hot(&self, id: &ProductId, is_hot: bool) -> Result<(), SyncError> {
        let m = Mutation::MarkProductHot;
        let id = id.clone();
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.mark_product_as_hot(&id, is_hot).await
        })
        .await
    }

    pub async fn delete_product(&self, id: &ProductId) -> Result<(), SyncError> {
        let m = Mutation::DeleteProduct;
        let id = id.clone();
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.delete_product(&id).await
        })
        .await
    }

    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), SyncError> {
        let m = Mutation::UpdateOrderStatus;
        let order_id = order_id.clone();
        self.mutate(m.name(), &m.invalidates(), |backend| async move {
            backend.update_order_status(&order_id, &status).await
        })
        .await
    }

    /// Open an admin session.
    ///
    /// Refused credentials fail with [`SyncError::InvalidCredentials`]; a
    /// call that never got an answer fails with the underlying error. Either
    /// way the session becomes inactive and the cached flag reads `false`.
    pub async fn admin_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminSessionState, SyncError> {
        let outcome = match self.connection.require() {
            Ok(backend) => backend
                .admin_login(email, password)
                .await
                .map_err(SyncError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(true) => {
                let state = self.transition(AdminSessionEvent::LoginSucceeded)?;
                self.cache.invalidate(&Mutation::AdminLogin.invalidates());
                Ok(state)
            }
            Ok(false) => {
                self.transition(AdminSessionEvent::LoginRejected)?;
                Err(SyncError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!(error = %e, "admin login failed");
                self.transition(AdminSessionEvent::LoginFailed)?;
                Err(e)
            }
        }
    }

    /// Close the admin session. The cached flag is set to `false` directly.
    ///
    /// The local session ends even when the backend call fails; that
    /// failure is still returned.
    pub async fn admin_logout(&self) -> Result<AdminSessionState, SyncError> {
        let m = Mutation::AdminLogout;
        let outcome = self
            .mutate(m.name(), &m.invalidates(), |backend| async move {
                backend.admin_logout().await
            })
            .await;
        let state = self.transition(AdminSessionEvent::LoggedOut)?;
        outcome.map(|()| state)
    }

    /// Submit the cart as an order and empty it.
    ///
    /// The cart is left untouched if the submission fails.
    pub async fn checkout(&self, cart: &mut CartStore) -> Result<(), SyncError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }

        let items = cart.to_order_items();
        let lines = items.len();
        self.submit_order(items).await?;
        cart.clear_cart();
        tracing::info!(lines, "order submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackendError, Connection, InMemoryBackend};
    use std::sync::Arc;

    fn client() -> (SyncClient, Arc<InMemoryBackend>) {
        let backend = Arc::new(
            InMemoryBackend::new()
                .with_admin_credentials("admin@hitech.example", "letmein")
                .with_category(Category::new("antibiotics", "Antibiotics")),
        );
        (SyncClient::new(Connection::connected(backend.clone())), backend)
    }

    #[test]
    fn test_invalidation_table() {
        assert_eq!(
            Mutation::UpdateProduct.invalidates(),
            vec![QueryKey::products(), QueryKey::any_product(), QueryKey::hot_products()]
        );
        assert_eq!(
            Mutation::SubmitOrder.invalidates(),
            vec![QueryKey::order_history(), QueryKey::admin_orders()]
        );
        assert!(!Mutation::AdminLogout
            .invalidates()
            .contains(&QueryKey::admin_session_active()));
    }

    #[tokio::test]
    async fn test_mutation_without_connection() {
        let client = SyncClient::new(Connection::new());
        let err = client
            .add_category(Category::new("x", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ActorNotAvailable));
    }

    #[tokio::test]
    async fn test_save_profile_invalidates_profile() {
        let (client, _backend) = client();
        assert_eq!(client.current_user_profile().await.unwrap().data, None);

        let profile = ProfileForm {
            name: "City Pharmacy".into(),
            email: "orders@city.example".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        client.save_caller_user_profile(profile.clone()).await.unwrap();

        assert_eq!(client.current_user_profile().await.unwrap().data, Some(profile));
    }

    #[tokio::test]
    async fn test_failed_mutation_invalidates_nothing() {
        let (client, backend) = client();
        client.categories().await.unwrap();
        backend.fail_next("add_category", BackendError::Transport("down".into()));

        client.admin_login("admin@hitech.example", "letmein").await.unwrap();
        assert!(client.add_category(Category::new("x", "X")).await.is_err());
        assert!(!client.cache().state(&QueryKey::categories()).unwrap().stale);
    }

    #[tokio::test]
    async fn test_admin_login_rejected() {
        let (client, _backend) = client();
        let err = client.admin_login("admin@hitech.example", "nope").await.unwrap_err();

        assert!(matches!(err, SyncError::InvalidCredentials));
        assert_eq!(client.admin_session(), AdminSessionState::Inactive);
        assert_eq!(
            client.cache().get_data::<bool>(&QueryKey::admin_session_active()).unwrap(),
            Some(false)
        );
    }

    #[tokio::test]
    async fn test_admin_login_transport_failure_is_not_invalid_credentials() {
        let (client, backend) = client();
        backend.fail_next("admin_login", BackendError::Transport("timeout".into()));

        let err = client.admin_login("admin@hitech.example", "letmein").await.unwrap_err();
        assert!(matches!(err, SyncError::Backend(BackendError::Transport(_))));
        assert_eq!(
            client.cache().get_data::<bool>(&QueryKey::admin_session_active()).unwrap(),
            Some(false)
        );
    }

    #[tokio::test]
    async fn test_admin_login_then_logout() {
        let (client, _backend) = client();
        let state = client.admin_login("admin@hitech.example", "letmein").await.unwrap();
        assert!(state.is_active());
        assert!(client.is_admin_session_active().await.unwrap().data);

        let state = client.admin_logout().await.unwrap();
        assert_eq!(state, AdminSessionState::Inactive);
        let flag = client.is_admin_session_active().await.unwrap();
        assert!(!flag.data);
        assert_eq!(flag.status, crate::CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_admin_logout_ends_session_when_backend_fails() {
        let (client, backend) = client();
        client.admin_login("admin@hitech.example", "letmein").await.unwrap();
        backend.fail_next("admin_logout", BackendError::Transport("timeout".into()));

        let err = client.admin_logout().await.unwrap_err();
        assert!(matches!(err, SyncError::Backend(BackendError::Transport(_))));
        assert_eq!(client.admin_session(), AdminSessionState::Inactive);
        assert_eq!(
            client.cache().get_data::<bool>(&QueryKey::admin_session_active()).unwrap(),
            Some(false)
        );
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let (client, backend) = client();
        let mut cart = CartStore::open(Arc::new(pharma_store::MemoryStore::new()));

        let err = client.checkout(&mut cart).await.unwrap_err();
        assert!(matches!(err, SyncError::Validation(CommerceError::EmptyCart)));
        assert_eq!(backend.calls("submit_order"), 0);
    }
}
