//! Product catalog types.
//!
//! Field names follow the remote service's JSON wire format (`_id`,
//! `imageBase64`). Prices use [`rust_decimal::Decimal`] but serialize as
//! plain JSON numbers, which is what the service produces and expects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ProductId;

/// A catalog entry as returned by the remote product service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text category label.
    pub category: String,
    /// Unit price, non-negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Quantity on hand.
    pub quantity: u32,
    /// Low-stock threshold.
    pub threshold: u32,
    /// Image URL or data URI, if the product has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Whether this product is at or below its low-stock threshold.
    ///
    /// Recomputed on every call; never cached as a flag.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }
}

/// Validation failures caught before a draft reaches the network or cache.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Product name is empty.
    #[error("product name is required")]
    MissingName,

    /// Category label is empty.
    #[error("product category is required")]
    MissingCategory,

    /// Unit price is negative.
    #[error("price must not be negative")]
    NegativePrice,
}

/// All [`Product`] fields except the identifier, used for create and update.
///
/// The optional image is carried base64-encoded for transport, matching the
/// service's `imageBase64` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Free-text category label.
    pub category: String,
    /// Unit price, non-negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Quantity on hand.
    pub quantity: u32,
    /// Low-stock threshold.
    pub threshold: u32,
    /// Base64-encoded image payload, omitted from the body when absent.
    #[serde(
        rename = "imageBase64",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_base64: Option<String>,
}

impl ProductDraft {
    /// Check required fields before any network call.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: missing name, missing category, or a
    /// negative price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ValidationError::NegativePrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Brake Pad Set".to_string(),
            category: "Brakes".to_string(),
            price: dec!(2200),
            quantity: 4,
            threshold: 5,
            image_base64: None,
        }
    }

    #[test]
    fn test_low_stock_boundary() {
        let mut product = Product {
            id: ProductId::new("p1"),
            name: "Oil Filter".to_string(),
            category: "Engine".to_string(),
            price: dec!(350),
            quantity: 5,
            threshold: 5,
            image: None,
        };
        assert!(product.is_low_stock());

        product.quantity = 6;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_product_wire_format() {
        let json = r#"{
            "_id": "66b2f0c9e1",
            "name": "Spark Plug",
            "category": "Electrical",
            "price": 50.5,
            "quantity": 3,
            "threshold": 5
        }"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.id, ProductId::new("66b2f0c9e1"));
        assert_eq!(product.price, dec!(50.5));
        assert_eq!(product.image, None);

        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["_id"], "66b2f0c9e1");
        // Price stays a JSON number, not a string
        assert!(value["price"].is_number());
        // Absent image is omitted entirely
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_draft_image_field_name() {
        let mut d = draft();
        d.image_base64 = Some("data:image/png;base64,AAAA".to_string());
        let value = serde_json::to_value(&d).expect("serialize");
        assert!(value.get("imageBase64").is_some());
        assert!(value.get("image_base64").is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn test_validate_missing_name() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert_eq!(d.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_validate_missing_category() {
        let mut d = draft();
        d.category = String::new();
        assert_eq!(d.validate(), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn test_validate_negative_price() {
        let mut d = draft();
        d.price = dec!(-1);
        assert_eq!(d.validate(), Err(ValidationError::NegativePrice));
    }

    #[test]
    fn test_validate_zero_price_allowed() {
        let mut d = draft();
        d.price = Decimal::ZERO;
        assert_eq!(d.validate(), Ok(()));
    }
}
