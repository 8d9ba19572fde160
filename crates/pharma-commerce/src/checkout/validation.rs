//! Client-side form validation.
//!
//! Each form holds raw user input. `validate` trims it, enforces required
//! fields and produces the typed value a mutation takes. Nothing here talks
//! to the backend.

use crate::catalog::{Category, PhotoRef, ProductUpdate};
use crate::checkout::{OrderStatus, UserProfile};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId};

/// Trim a field, mapping blank input to `None`.
fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(value: &str, field: &'static str) -> Result<String, CommerceError> {
    optional(value).ok_or(CommerceError::MissingField(field))
}

/// Parse a non-negative amount. Blank input counts as zero.
fn amount(value: &str, field: &'static str) -> Result<i64, CommerceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(CommerceError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}

/// Profile setup dialog input.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub pan_number: String,
    pub address: String,
}

impl ProfileForm {
    /// Name and email are required.
    pub fn validate(&self) -> Result<UserProfile, CommerceError> {
        Ok(UserProfile {
            name: required(&self.name, "name")?,
            email: required(&self.email, "email")?,
            phone_number: optional(&self.phone_number),
            pan_number: optional(&self.pan_number),
            address: optional(&self.address),
        })
    }
}

/// Add-category dialog input.
#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub id: String,
    pub name: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<Category, CommerceError> {
        Ok(Category::new(
            CategoryId::new(required(&self.id, "id")?),
            required(&self.name, "name")?,
        ))
    }
}

/// Product editor dialog input.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub net_rate: String,
    pub mrp: String,
    pub category_id: String,
    pub bonus_offer: String,
    pub photo: Option<PhotoRef>,
    pub is_hot: bool,
}

impl ProductForm {
    /// Id, name and category are required; prices default to zero.
    pub fn validate(&self) -> Result<ProductUpdate, CommerceError> {
        let id = required(&self.id, "id")?;
        let name = required(&self.name, "name")?;
        let category_id = required(&self.category_id, "category")?;

        Ok(ProductUpdate {
            id: ProductId::new(id),
            name,
            description: self.description.trim().to_string(),
            net_rate: amount(&self.net_rate, "net rate")?,
            mrp: amount(&self.mrp, "mrp")?,
            photo: self.photo.clone(),
            category_id: CategoryId::new(category_id),
            bonus_offer: optional(&self.bonus_offer),
            is_hot: self.is_hot,
        })
    }
}

/// Order status selector input.
#[derive(Debug, Clone, Default)]
pub struct StatusForm {
    pub status: String,
}

impl StatusForm {
    pub fn validate(&self) -> Result<OrderStatus, CommerceError> {
        required(&self.status, "status").map(|s| OrderStatus::parse(&s))
    }
}
