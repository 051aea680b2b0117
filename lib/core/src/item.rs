use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Kind of user interaction recorded against a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Click,
    AddToCart,
    Purchase,
}

impl InteractionType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Click => "click",
            InteractionType::AddToCart => "add_to_cart",
            InteractionType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Ok(InteractionType::View),
            "click" => Ok(InteractionType::Click),
            "add_to_cart" | "add-to-cart" | "cart" => Ok(InteractionType::AddToCart),
            "purchase" => Ok(InteractionType::Purchase),
            other => Err(Error::InvalidProduct(format!("unknown interaction type: {}", other))),
        }
    }
}

/// A product as stored in the catalog.
///
/// The recommender only ever reads these; every build works on an owned
/// snapshot of the full catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub user_id: Option<String>,
    pub interaction_type: Option<InteractionType>,
    pub interaction_weight: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Create an item with the given identity and timestamps set to now
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            category: category.into(),
            price,
            stock: 0,
            user_id: None,
            interaction_type: None,
            interaction_weight: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Materialize a validated creation request under the given id
    pub fn from_new(id: impl Into<String>, product: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            stock: product.stock,
            user_id: product.user_id,
            interaction_type: product.interaction_type,
            interaction_weight: product.interaction_weight,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn with_interaction(
        mut self,
        user_id: impl Into<String>,
        interaction_type: InteractionType,
        weight: f64,
    ) -> Self {
        self.user_id = Some(user_id.into());
        self.interaction_type = Some(interaction_type);
        self.interaction_weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Description text, empty when absent
    #[inline]
    #[must_use]
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Payload for creating a catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub interaction_type: Option<InteractionType>,
    #[serde(default)]
    pub interaction_weight: Option<f64>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: category.into(),
            price,
            stock: 0,
            user_id: None,
            interaction_type: None,
            interaction_weight: None,
        }
    }

    /// Reject input the recommender assumes never reaches it
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidProduct("name must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidProduct("category must not be empty".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidProduct(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        if let Some(weight) = self.interaction_weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::InvalidProduct(format!(
                    "interaction_weight must be positive, got {}",
                    weight
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_type_parse() {
        assert_eq!("purchase".parse::<InteractionType>().unwrap(), InteractionType::Purchase);
        assert_eq!("Add-To-Cart".parse::<InteractionType>().unwrap(), InteractionType::AddToCart);
        assert!("wishlist".parse::<InteractionType>().is_err());
    }

    #[test]
    fn test_interaction_type_serde() {
        let json = serde_json::to_string(&InteractionType::AddToCart).unwrap();
        assert_eq!(json, "\"add_to_cart\"");
    }

    #[test]
    fn test_validate() {
        assert!(NewProduct::new("Portland cement", "cement", 12.5).validate().is_ok());
        assert!(NewProduct::new("  ", "cement", 12.5).validate().is_err());
        assert!(NewProduct::new("Bag", "", 12.5).validate().is_err());
        assert!(NewProduct::new("Bag", "cement", -1.0).validate().is_err());
        assert!(NewProduct::new("Bag", "cement", f64::NAN).validate().is_err());

        let mut weighted = NewProduct::new("Bag", "cement", 1.0);
        weighted.interaction_weight = Some(0.0);
        assert!(weighted.validate().is_err());
        weighted.interaction_weight = Some(2.5);
        assert!(weighted.validate().is_ok());
    }

    #[test]
    fn test_from_new_copies_fields() {
        let mut product = NewProduct::new("Rebar", "steel", 8.0);
        product.stock = 40;
        product.description = Some("10mm rods".to_string());
        let now = Utc::now();
        let item = CatalogItem::from_new("id-1", product, now);
        assert_eq!(item.id, "id-1");
        assert_eq!(item.stock, 40);
        assert_eq!(item.description_or_empty(), "10mm rods");
        assert_eq!(item.created_at, now);
    }
}
