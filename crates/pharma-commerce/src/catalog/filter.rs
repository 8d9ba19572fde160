//! Listing filters for the product pages.

use crate::catalog::Product;
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// Filters applied to the product list before display.
///
/// All set criteria must match. Results are sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Only names starting with this letter (A–Z index).
    pub letter: Option<char>,
    /// Only products in this category.
    pub category: Option<CategoryId>,
    /// Only products flagged as hot.
    pub hot_only: bool,
    /// Case-insensitive substring of name or description.
    pub text: Option<String>,
}

impl ProductFilter {
    /// Create an empty filter that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to names starting with `letter`.
    pub fn with_letter(mut self, letter: char) -> Self {
        self.letter = Some(letter.to_ascii_uppercase());
        self
    }

    /// Restrict to one category.
    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Keep only hot products.
    pub fn hot_only(mut self) -> Self {
        self.hot_only = true;
        self
    }

    /// Restrict to a text search. Blank text is ignored.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.text = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Check a single product against the filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(letter) = self.letter {
            let starts = product
                .name
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase() == letter)
                .unwrap_or(false);
            if !starts {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &product.category.id != category {
                return false;
            }
        }

        if self.hot_only && !product.is_hot {
            return false;
        }

        if let Some(text) = &self.text {
            let hit = product.name.to_lowercase().contains(text)
                || product.description.to_lowercase().contains(text);
            if !hit {
                return false;
            }
        }

        true
    }

    /// Apply the filter and sort by name.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut filtered: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::fixtures::product;

    fn catalog() -> Vec<Product> {
        let mut hot = product("p3", "azithromycin", "antibiotics", 300);
        hot.is_hot = true;
        vec![
            product("p1", "Paracetamol", "analgesics", 20),
            product("p2", "Amoxicillin", "antibiotics", 120),
            hot,
            product("p4", "Pantoprazole", "antacids", 90),
        ]
    }

    #[test]
    fn test_letter_filter_sorts_by_name() {
        let result = ProductFilter::new().with_letter('a').apply(&catalog());
        let names: Vec<&str> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Amoxicillin", "azithromycin"]);
    }

    #[test]
    fn test_category_and_hot() {
        let result = ProductFilter::new()
            .with_category("antibiotics")
            .hot_only()
            .apply(&catalog());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "p3");
    }

    #[test]
    fn test_text_search() {
        let result = ProductFilter::new().with_text("  PANTO ").apply(&catalog());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Pantoprazole");
    }

    #[test]
    fn test_blank_text_keeps_everything() {
        let filter = ProductFilter::new().with_text("   ");
        assert!(filter.text.is_none());
        assert_eq!(filter.apply(&catalog()).len(), 4);
    }
}
