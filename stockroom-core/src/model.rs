//! # Product Model
//!
//! Serde types for the product resource.
//!
//! ## Design Principles (SOLID)
//!
//! - **S**: Only the wire/row representation of a product
//! - **D**: Handlers and store exchange these types, never raw rows

use serde::{Deserialize, Serialize};

/// A stored product
///
/// `id` is assigned by the store on creation and immutable thereafter.
/// Field order fixes the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier
    pub id: i64,
    /// Product name, non-empty
    pub name: String,
    /// Units on hand
    pub quantity: i64,
    /// Unit price
    pub price: f64,
}

/// Client-supplied product payload for create and update
///
/// Has no `id` field; an `id` in the request body is ignored, so the
/// path parameter always wins on update. Missing `quantity` defaults
/// to 0; missing `name` or `price` fails deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Product name, non-empty
    pub name: String,
    /// Units on hand
    #[serde(default)]
    pub quantity: i64,
    /// Unit price
    pub price: f64,
}

impl ProductDraft {
    /// Check the invariants deserialization cannot enforce
    ///
    /// Currently just the non-empty `name` rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Attach a store-assigned id, producing a full Product
    #[must_use]
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
        }
    }
}
