//! Product catalog module.
//!
//! Contains the product and category types read from the backend and the
//! filters the listing pages apply to them.

mod category;
mod filter;
mod product;

pub use category::Category;
pub use filter::ProductFilter;
pub use product::{PhotoRef, Product, ProductUpdate};
