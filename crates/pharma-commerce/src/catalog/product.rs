//! Product types.

use crate::cart::CartItem;
use crate::catalog::Category;
use crate::ids::{CategoryId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Reference to a product photo held by the backend blob store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Wrap a direct URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL the photo can be fetched from.
    pub fn direct_url(&self) -> &str {
        &self.0
    }
}

/// A product in the wholesale catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Wholesale price charged to the pharmacy.
    pub net_rate: i64,
    /// Maximum retail price printed on the pack.
    pub mrp: i64,
    /// Product photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoRef>,
    /// Category the product is listed under.
    pub category: Category,
    /// Scheme text such as "10+1 free".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_offer: Option<String>,
    /// Featured on the home page.
    #[serde(default)]
    pub is_hot: bool,
}

impl Product {
    /// Snapshot used when this product is added to the cart.
    ///
    /// The cart is priced at the net rate.
    pub fn to_cart_item(&self) -> CartItem {
        CartItem::new(self.id.clone(), self.name.clone(), self.net_rate)
    }

    /// Net rate as money.
    pub fn net_rate_money(&self, currency: Currency) -> Money {
        Money::new(self.net_rate, currency)
    }

    /// Retailer margin per unit (`mrp - net_rate`), never negative.
    pub fn margin(&self) -> i64 {
        self.mrp.saturating_sub(self.net_rate).max(0)
    }
}

/// Fields sent with an `updateProduct` call.
///
/// The backend upserts: an unknown id creates the product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub net_rate: i64,
    pub mrp: i64,
    pub photo: Option<PhotoRef>,
    pub category_id: CategoryId,
    pub bonus_offer: Option<String>,
    pub is_hot: bool,
}

impl ProductUpdate {
    /// Prefill an update from an existing product, as the editor dialog does.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            net_rate: product.net_rate,
            mrp: product.mrp,
            photo: product.photo.clone(),
            category_id: product.category.id.clone(),
            bonus_offer: product.bonus_offer.clone(),
            is_hot: product.is_hot,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(id: &str, name: &str, category: &str, net_rate: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            net_rate,
            mrp: net_rate + net_rate / 5,
            photo: None,
            category: Category::new(category, category),
            bonus_offer: None,
            is_hot: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;

    #[test]
    fn test_to_cart_item_uses_net_rate() {
        let p = product("amox", "Amoxicillin", "antibiotics", 120);
        let item = p.to_cart_item();
        assert_eq!(item.unit_price, 120);
        assert_eq!(item.product_name, "Amoxicillin");
    }

    #[test]
    fn test_margin() {
        let mut p = product("amox", "Amoxicillin", "antibiotics", 100);
        p.mrp = 130;
        assert_eq!(p.margin(), 30);
        p.mrp = 90;
        assert_eq!(p.margin(), 0);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "id": "p1",
            "name": "Cetirizine",
            "description": "",
            "netRate": 40,
            "mrp": 55,
            "category": { "id": "antihistamine", "name": "Antihistamine" }
        }"#;
        let p: super::Product = serde_json::from_str(json).unwrap();
        assert!(!p.is_hot);
        assert!(p.photo.is_none());
        assert_eq!(p.category.name, "Antihistamine");
    }
}
