//! Query keys.
//!
//! A key is the operation name followed by its parameters. Invalidation
//! matches by prefix, so `["product"]` covers every `["product", <id>]`.

use pharma_commerce::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// Operation names used as the first key segment.
pub mod names {
    pub const PRODUCTS: &str = "products";
    pub const HOT_PRODUCTS: &str = "hotProducts";
    pub const PRODUCT: &str = "product";
    pub const CATEGORIES: &str = "categories";
    pub const CURRENT_USER_PROFILE: &str = "currentUserProfile";
    pub const ORDER_HISTORY: &str = "orderHistory";
    pub const ADMIN_ORDERS: &str = "adminOrders";
    pub const IS_ADMIN: &str = "isAdmin";
    pub const ADMIN_SESSION_ACTIVE: &str = "adminSessionActive";
    pub const ORDER_CUSTOMER: &str = "orderCustomer";
}

/// Identifies one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// A single-segment key.
    pub fn named(name: &str) -> Self {
        Self(vec![name.to_string()])
    }

    /// The empty key. As a prefix it matches every key.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Append a parameter segment.
    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` is a leading run of this key's segments.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn products() -> Self {
        Self::named(names::PRODUCTS)
    }

    pub fn hot_products() -> Self {
        Self::named(names::HOT_PRODUCTS)
    }

    /// Prefix of every single-product key.
    pub fn any_product() -> Self {
        Self::named(names::PRODUCT)
    }

    pub fn product(id: &ProductId) -> Self {
        Self::any_product().with(id.as_str())
    }

    pub fn categories() -> Self {
        Self::named(names::CATEGORIES)
    }

    pub fn current_user_profile() -> Self {
        Self::named(names::CURRENT_USER_PROFILE)
    }

    pub fn order_history() -> Self {
        Self::named(names::ORDER_HISTORY)
    }

    pub fn admin_orders() -> Self {
        Self::named(names::ADMIN_ORDERS)
    }

    pub fn is_admin() -> Self {
        Self::named(names::IS_ADMIN)
    }

    pub fn admin_session_active() -> Self {
        Self::named(names::ADMIN_SESSION_ACTIVE)
    }

    pub fn order_customer(order_id: &OrderId) -> Self {
        Self::named(names::ORDER_CUSTOMER).with(order_id.as_str())
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}
