//! Catalog records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// Label shown on the product list when no category filter is active.
pub const ALL_PRODUCTS_LABEL: &str = "All Products";

/// Product category.
///
/// This is the one definition of the category set; validators, the store,
/// list filtering and the views all read [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Fresh fruit.
    Fruits,
    /// Vegetables.
    Vegetables,
    /// Meat.
    Meat,
    /// Baked goods.
    Bread,
    /// Books.
    Books,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 5] = [
        Self::Fruits,
        Self::Vegetables,
        Self::Meat,
        Self::Bread,
        Self::Books,
    ];

    /// Returns the stored (lowercase) name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fruits => "fruits",
            Self::Vegetables => "vegetables",
            Self::Meat => "meat",
            Self::Bread => "bread",
            Self::Books => "books",
        }
    }

    /// Returns every stored name, in display order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Parses user input after trimming and lowercasing it.
    #[must_use]
    pub fn normalize(input: &str) -> Option<Self> {
        let wanted = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Validated product fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Display name, never blank.
    pub name: String,
    /// Price, finite and non-negative.
    pub price: f64,
    /// Category from the fixed set.
    pub category: Category,
    /// Owning farm, if any.
    #[serde(default)]
    pub farm: Option<RecordId>,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Record id.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Price.
    pub price: f64,
    /// Category.
    pub category: Category,
    /// Owning farm, if any.
    pub farm: Option<RecordId>,
}

impl Product {
    /// Builds a stored product from a draft.
    #[must_use]
    pub fn from_draft(id: RecordId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            category: draft.category,
            farm: draft.farm,
        }
    }

    /// Returns the writable fields as a draft.
    #[must_use]
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: self.price,
            category: self.category,
            farm: self.farm,
        }
    }
}

/// Validated farm fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmDraft {
    /// Farm name, never blank.
    pub name: String,
    /// Town or city.
    #[serde(default)]
    pub city: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// A stored farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    /// Record id.
    pub id: RecordId,
    /// Farm name.
    pub name: String,
    /// Town or city.
    pub city: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Ids of the farm's products, maintained by the store.
    pub products: Vec<RecordId>,
}

impl Farm {
    /// Builds a stored farm with no products.
    #[must_use]
    pub fn from_draft(id: RecordId, draft: FarmDraft) -> Self {
        Self {
            id,
            name: draft.name,
            city: draft.city,
            email: draft.email,
            products: Vec::new(),
        }
    }
}

/// A product with its farm reference resolved.
///
/// `farm` is `None` when the product has no farm or the reference dangles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithFarm {
    /// The product.
    pub product: Product,
    /// The resolved farm.
    pub farm: Option<Farm>,
}

/// A farm with its products resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmWithProducts {
    /// The farm.
    pub farm: Farm,
    /// Products that still exist, in the farm's order.
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_normalization() {
        assert_eq!(Category::normalize("Fruits"), Some(Category::Fruits));
        assert_eq!(Category::normalize("  BREAD "), Some(Category::Bread));
        assert_eq!(Category::normalize("animal"), None);
        assert_eq!(Category::normalize(""), None);
    }

    #[test]
    fn test_category_names_follow_all() {
        assert_eq!(
            Category::names(),
            ["fruits", "vegetables", "meat", "bread", "books"]
        );
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Vegetables).unwrap();
        assert_eq!(json, "\"vegetables\"");
        let back: Category = serde_json::from_str("\"meat\"").unwrap();
        assert_eq!(back, Category::Meat);
    }

    #[test]
    fn test_product_draft_round_trip_through_record() {
        let draft = ProductDraft {
            name: "Honeycrisp".to_string(),
            price: 1.25,
            category: Category::Fruits,
            farm: None,
        };
        let product = Product::from_draft(RecordId::new(), draft.clone());
        assert_eq!(product.to_draft(), draft);
    }
}
