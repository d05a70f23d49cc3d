//! Catalog records, cart entries and stock levels.
//!
//! The inventory service serves a [`CatalogProduct`] per identifier; once a
//! product is placed in the cart it becomes a [`Product`] carrying the held
//! quantity. Display fields are carried through unchanged, including any
//! the service sends that are not modelled here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// A product record as served by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    /// Unit price, serialized as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogProduct {
    /// Turn the catalog record into a cart entry holding `amount` units.
    #[must_use]
    pub fn into_cart_product(self, amount: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            amount,
            extra: self.extra,
        }
    }
}

/// A product held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Quantity currently held in the cart.
    pub amount: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Copy of this entry with a different quantity.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Purchasable quantity of a product. Fetched on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
