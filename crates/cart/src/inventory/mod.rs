//! Inventory service: stock levels and product records.
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` - product record without `amount`
//!
//! Stock is fetched on every call. Product records are cached in memory via
//! `moka` (5 minute TTL) since display fields rarely change.

mod client;

pub use client::HttpInventory;

use std::future::Future;

use rocketshoes_core::{CatalogProduct, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the inventory service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service has no record of the product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The service answered with a non-success status.
    #[error("Inventory service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot have paths appended.
    #[error("Invalid inventory base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Source of stock levels and product records.
pub trait Inventory: Send + Sync {
    /// Current purchasable quantity for a product.
    fn stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Stock, InventoryError>> + Send;

    /// Full catalog record for a product.
    fn product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<CatalogProduct, InventoryError>> + Send;
}
