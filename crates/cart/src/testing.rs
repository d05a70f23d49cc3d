//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rocketshoes_core::{CatalogProduct, Product, ProductId, Stock};
use rust_decimal::Decimal;

use crate::inventory::{Inventory, InventoryError};
use crate::storage::{PersistentStore, StorageError};

pub fn catalog(id: i64) -> CatalogProduct {
    CatalogProduct {
        id: ProductId::new(id),
        title: format!("Tênis {id}"),
        price: Decimal::new(13990, 2),
        image: Some(format!("https://cdn.example.com/{id}.jpg")),
        extra: serde_json::Map::new(),
    }
}

pub fn product(id: i64, amount: u32) -> Product {
    catalog(id).into_cart_product(amount)
}

/// In-memory inventory with adjustable stock and call counters.
#[derive(Clone, Default)]
pub struct FakeInventory {
    stock: Arc<Mutex<HashMap<ProductId, u32>>>,
    unreachable: Arc<Mutex<bool>>,
    stock_calls: Arc<AtomicUsize>,
    product_calls: Arc<AtomicUsize>,
}

impl FakeInventory {
    pub fn with_stock(levels: &[(i64, u32)]) -> Self {
        let inventory = Self::default();
        for (id, amount) in levels {
            inventory.set_stock(*id, *amount);
        }
        inventory
    }

    pub fn set_stock(&self, id: i64, amount: u32) {
        self.stock
            .lock()
            .unwrap()
            .insert(ProductId::new(id), amount);
    }

    /// Make every subsequent request fail as if the service were down.
    pub fn go_offline(&self) {
        *self.unreachable.lock().unwrap() = true;
    }

    fn check_online(&self) -> Result<(), InventoryError> {
        if *self.unreachable.lock().unwrap() {
            return Err(InventoryError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }

    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }
}

impl Inventory for FakeInventory {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let amount = self
            .stock
            .lock()
            .unwrap()
            .get(&product_id)
            .copied()
            .ok_or(InventoryError::NotFound(product_id))?;
        // Yield so overlapping callers interleave at the await point
        tokio::task::yield_now().await;
        Ok(Stock {
            id: product_id,
            amount,
        })
    }

    async fn product(&self, product_id: ProductId) -> Result<CatalogProduct, InventoryError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        if !self.stock.lock().unwrap().contains_key(&product_id) {
            return Err(InventoryError::NotFound(product_id));
        }
        Ok(catalog(product_id.as_i64()))
    }
}

/// Store whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyStore;

impl PersistentStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: "/read-only".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}
