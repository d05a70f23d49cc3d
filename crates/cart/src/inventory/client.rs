//! HTTP client for the inventory service.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rocketshoes_core::{CatalogProduct, ProductId, Stock};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{Inventory, InventoryError};
use crate::config::InventoryConfig;

/// Stock payload. The identifier in the body is ignored in favour of the
/// one that was requested.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: i64,
}

impl StockResponse {
    /// Units available for purchase. Negative levels count as sold out.
    fn available(&self) -> u32 {
        u32::try_from(self.amount.max(0)).unwrap_or(u32::MAX)
    }
}

/// Client for the inventory service.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpInventory {
    inner: Arc<HttpInventoryInner>,
}

struct HttpInventoryInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, CatalogProduct>,
}

impl HttpInventory {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidBaseUrl` if the base URL cannot carry
    /// paths, or `InventoryError::Http` if the HTTP client cannot be built.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        if config.base_url.cannot_be_a_base() {
            return Err(InventoryError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(HttpInventoryInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// Resolve `{base}/{resource}/{id}`.
    fn endpoint(&self, resource: &str, product_id: ProductId) -> Result<Url, InventoryError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| InventoryError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push(resource)
            .push(&product_id.to_string());
        Ok(url)
    }

    /// GET a JSON document, mapping 404 to `NotFound`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        product_id: ProductId,
    ) -> Result<T, InventoryError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(product_id));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Inventory service returned non-success status"
            );
            return Err(InventoryError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse inventory response"
            );
            InventoryError::Parse(e)
        })
    }
}

impl Inventory for HttpInventory {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        let url = self.endpoint("stock", product_id)?;
        let stock: StockResponse = self.get_json(url, product_id).await?;
        tracing::debug!(amount = stock.amount, "Fetched stock");
        Ok(Stock {
            id: product_id,
            amount: stock.available(),
        })
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<CatalogProduct, InventoryError> {
        if let Some(product) = self.inner.products.get(&product_id).await {
            tracing::debug!("Product cache hit");
            return Ok(product);
        }

        let url = self.endpoint("products", product_id)?;
        let product: CatalogProduct = self.get_json(url, product_id).await?;
        self.inner.products.insert(product_id, product.clone()).await;
        Ok(product)
    }
}
