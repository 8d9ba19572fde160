//! Order types.

use crate::checkout::UserProfile;
use crate::ids::{OrderId, Principal, ProductId};
use serde::{Deserialize, Serialize};

/// Order status.
///
/// The backend stores status as a free string; values outside the known set
/// are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// Any other status string.
    Other(String),
}

impl OrderStatus {
    /// Statuses an administrator can choose from.
    pub const SELECTABLE: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(s) => s,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Other(s) => s,
        }
    }

    /// Parse a status string, case-insensitively.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(s.to_string()),
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        OrderStatus::parse(&s)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One product line in a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product ordered.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: i64,
}

/// An order as recorded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Order status.
    pub status: OrderStatus,
    /// Identity of the customer who placed it.
    pub customer: Principal,
    /// Items in the order.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Customer identity and profile behind an order (admin view).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Caller identity that placed the order.
    pub customer: Principal,
    /// Profile, if the customer completed one.
    pub profile: Option<UserProfile>,
}

/// Count of orders still pending, for the admin dashboard.
pub fn pending_order_count(orders: &[Order]) -> usize {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count()
}

/// Sort orders by id, newest (highest) first, as the admin list shows them.
pub fn sort_orders_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.id.cmp(&a.id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            status,
            customer: Principal::new("aaaaa-aa"),
            items: vec![OrderItem {
                product_id: ProductId::new("p1"),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn test_status_round_trips_through_string() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, r#""shipped""#);

        let custom: OrderStatus = serde_json::from_str(r#""on-hold""#).unwrap();
        assert_eq!(custom, OrderStatus::Other("on-hold".to_string()));
        assert_eq!(custom.as_str(), "on-hold");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("Delivered"), OrderStatus::Delivered);
        assert!(OrderStatus::parse("CANCELLED").is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_pending_count_and_sort() {
        let mut orders = vec![
            order("order-1", OrderStatus::Pending),
            order("order-3", OrderStatus::Shipped),
            order("order-2", OrderStatus::Pending),
        ];
        assert_eq!(pending_order_count(&orders), 2);

        sort_orders_newest_first(&mut orders);
        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["order-3", "order-2", "order-1"]);
    }

    #[test]
    fn test_item_count() {
        assert_eq!(order("o", OrderStatus::Pending).item_count(), 2);
    }
}
