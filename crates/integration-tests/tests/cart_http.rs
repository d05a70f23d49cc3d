//! End-to-end cart tests against the fake inventory service.
//!
//! These tests exercise the HTTP inventory client, the file store and the
//! cart store together, the way the CLI wires them.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rocketshoes_cart::storage::load_cart;
use rocketshoes_cart::{
    CartContext, CartError, CartStore, FileStore, HttpInventory, Inventory, InventoryConfig,
    InventoryError, Notice, RecordingNotifier, UpdateProductAmount,
};
use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::InventoryServer;
use rust_decimal::Decimal;

const KEY: &str = "@RocketShoes:cart";

async fn server() -> InventoryServer {
    let server = InventoryServer::start().await;
    server.seed(1, "Tênis de Caminhada Leve Confortável", Decimal::new(1799, 1), 3);
    server.seed(
        2,
        "Tênis VR Caminhada Confortável Detalhes Couro Masculino",
        Decimal::new(13990, 2),
        5,
    );
    server.seed(3, "Tênis Adidas Duramo Lite 2.0", Decimal::new(21990, 2), 0);
    server
}

fn inventory(server: &InventoryServer) -> HttpInventory {
    HttpInventory::new(&InventoryConfig::new(server.base_url())).unwrap()
}

// =============================================================================
// Inventory client
// =============================================================================

#[tokio::test]
async fn test_fetch_stock() {
    let server = server().await;
    let stock = inventory(&server).stock(ProductId::new(2)).await.unwrap();
    assert_eq!(stock.id, ProductId::new(2));
    assert_eq!(stock.amount, 5);
}

#[tokio::test]
async fn test_fetch_product() {
    let server = server().await;
    let product = inventory(&server).product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(product.price, Decimal::new(1799, 1));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = server().await;
    let err = inventory(&server).stock(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(id) if id == ProductId::new(99)));
}

#[tokio::test]
async fn test_malformed_stock_is_parse_error() {
    let server = server().await;
    server.break_stock(1);
    let err = inventory(&server).stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, InventoryError::Parse(_)));
}

#[tokio::test]
async fn test_product_records_are_cached_but_stock_is_not() {
    let server = server().await;
    let client = inventory(&server);

    client.product(ProductId::new(1)).await.unwrap();
    client.product(ProductId::new(1)).await.unwrap();
    client.stock(ProductId::new(1)).await.unwrap();
    client.stock(ProductId::new(1)).await.unwrap();

    assert_eq!(server.product_hits(), 1);
    assert_eq!(server.stock_hits(), 2);
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    // Reserve a port, then close it so nothing is listening there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut config = InventoryConfig::new(format!("http://{addr}").parse().unwrap());
    config.timeout = Duration::from_secs(2);
    let client = HttpInventory::new(&config).unwrap();

    let err = client.stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, InventoryError::Http(_)));
}

// =============================================================================
// Cart store over HTTP and files
// =============================================================================

#[tokio::test]
async fn test_add_and_reload_from_disk() {
    let server = server().await;
    let dir = tempfile::tempdir().unwrap();

    let mut store = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();
    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();

    let on_disk = load_cart(&FileStore::new(dir.path()), KEY).unwrap();
    assert_eq!(on_disk, *store.cart());

    let reloaded = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();
    let ids: Vec<i64> = reloaded.cart().iter().map(|p| p.id.as_i64()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(reloaded.cart().amount_of(ProductId::new(2)), 2);
}

#[tokio::test]
async fn test_stock_boundaries() {
    let server = server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();

    // Adding may reach the stock level exactly (stock of product 1 is 3)
    for _ in 0..3 {
        store.add_product(ProductId::new(1)).await.unwrap();
    }
    let err = store.add_product(ProductId::new(1)).await.unwrap_err();
    assert!(err.is_out_of_stock());
    assert_eq!(store.cart().amount_of(ProductId::new(1)), 3);

    // Updating must stay strictly below it
    let at_stock = UpdateProductAmount {
        product_id: ProductId::new(1),
        amount: 3,
    };
    assert!(store.update_product_amount(at_stock).await.unwrap_err().is_out_of_stock());
    let below_stock = UpdateProductAmount {
        product_id: ProductId::new(1),
        amount: 2,
    };
    store.update_product_amount(below_stock).await.unwrap();
    assert_eq!(store.cart().amount_of(ProductId::new(1)), 2);
}

#[tokio::test]
async fn test_stock_changes_are_seen_immediately() {
    let server = server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();

    store.add_product(ProductId::new(2)).await.unwrap();
    server.set_stock(2, 1);
    assert!(store.add_product(ProductId::new(2)).await.unwrap_err().is_out_of_stock());
    server.set_stock(2, 10);
    store.add_product(ProductId::new(2)).await.unwrap();
    assert_eq!(store.cart().amount_of(ProductId::new(2)), 2);
}

#[tokio::test]
async fn test_sold_out_product_cannot_be_added() {
    let server = server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();

    let err = store.add_product(ProductId::new(3)).await.unwrap_err();

    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 1,
            available: 0,
            ..
        }
    ));
    assert_eq!(server.product_hits(), 0);
    // Nothing was ever written
    assert!(FileStore::new(dir.path()).path_for(KEY).metadata().is_err());
}

#[tokio::test]
async fn test_context_reports_notices() {
    let server = server().await;
    let dir = tempfile::tempdir().unwrap();
    let store = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();
    let cart = CartContext::new(store, RecordingNotifier::new());

    cart.add_product(ProductId::new(2)).await.unwrap();
    let _ = cart.add_product(ProductId::new(3)).await;
    let _ = cart.add_product(ProductId::new(99)).await;
    let _ = cart.remove_product(ProductId::new(1)).await;
    let _ = cart
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(2),
            amount: 0,
        })
        .await;

    assert_eq!(
        cart.notifier().take(),
        vec![
            Notice::OutOfStock,
            Notice::AddFailed,
            Notice::RemoveFailed,
            Notice::UpdateFailed,
        ]
    );
    let snapshot = cart.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.amount_of(ProductId::new(2)), 1);
}

#[tokio::test]
async fn test_remove_persists() {
    let server = server().await;
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::load(inventory(&server), FileStore::new(dir.path()), KEY).unwrap();

    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();
    store.remove_product(ProductId::new(1)).unwrap();

    let on_disk = load_cart(&FileStore::new(dir.path()), KEY).unwrap();
    assert!(!on_disk.contains(ProductId::new(1)));
    assert!(on_disk.contains(ProductId::new(2)));
}
