//! Integration tests for the Rocketshoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests run against [`InventoryServer`], an in-process `axum` server that
//! serves `/stock/{id}` and `/products/{id}` from seeded data on an
//! ephemeral port. No external services are needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_core::{CatalogProduct, ProductId};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Clone, Default)]
struct ServerState {
    stock: Arc<Mutex<HashMap<i64, u32>>>,
    products: Arc<Mutex<HashMap<i64, CatalogProduct>>>,
    malformed_stock: Arc<Mutex<HashSet<i64>>>,
    stock_hits: Arc<AtomicUsize>,
    product_hits: Arc<AtomicUsize>,
}

/// Fake inventory service bound to `127.0.0.1` on a random port.
///
/// The server task is aborted when the value is dropped.
pub struct InventoryServer {
    base_url: Url,
    state: ServerState,
    handle: JoinHandle<()>,
}

impl InventoryServer {
    /// Bind and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = ServerState::default();
        let router = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let base_url = Url::parse(&format!("http://{addr}")).expect("Invalid server URL");
        Self {
            base_url,
            state,
            handle,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Seed a product record and its stock level.
    ///
    /// # Panics
    ///
    /// Panics if the server state lock is poisoned.
    pub fn seed(&self, id: i64, title: &str, price: Decimal, stock: u32) {
        let product = CatalogProduct {
            id: ProductId::new(id),
            title: title.to_string(),
            price,
            image: Some(format!("https://cdn.rocketshoes.dev/{id}.jpg")),
            extra: serde_json::Map::new(),
        };
        self.state
            .products
            .lock()
            .expect("products lock poisoned")
            .insert(id, product);
        self.set_stock(id, stock);
    }

    /// Change the stock level of a product.
    ///
    /// # Panics
    ///
    /// Panics if the server state lock is poisoned.
    pub fn set_stock(&self, id: i64, amount: u32) {
        self.state
            .stock
            .lock()
            .expect("stock lock poisoned")
            .insert(id, amount);
    }

    /// Serve an unparsable body for this product's stock.
    ///
    /// # Panics
    ///
    /// Panics if the server state lock is poisoned.
    pub fn break_stock(&self, id: i64) {
        self.state
            .malformed_stock
            .lock()
            .expect("malformed lock poisoned")
            .insert(id);
    }

    /// Number of `/stock` requests received.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// Number of `/products` requests received.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }
}

impl Drop for InventoryServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn stock(State(state): State<ServerState>, Path(id): Path<i64>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);

    let malformed = state
        .malformed_stock
        .lock()
        .is_ok_and(|ids| ids.contains(&id));
    if malformed {
        return (StatusCode::OK, "{\"amount\": \"plenty\"").into_response();
    }

    let amount = state.stock.lock().ok().and_then(|s| s.get(&id).copied());
    match amount {
        Some(amount) => Json(serde_json::json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(State(state): State<ServerState>, Path(id): Path<i64>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);

    let product = state.products.lock().ok().and_then(|p| p.get(&id).cloned());
    match product {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
