//! Rocketshoes Cart - client-side shopping cart state.
//!
//! Keeps the shopper's cart in memory, validates every change against the
//! inventory service's stock levels and writes the cart back to a local
//! key-value store after each successful change.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart and performs the three mutations
//! - [`inventory`] answers stock and product lookups over HTTP
//! - [`storage`] persists the JSON-serialized cart under a single key
//! - [`context::CartContext`] shares one store between callers and turns
//!   failures into user-facing [`notice::Notice`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{
//!     CartConfig, CartContext, CartStore, FileStore, HttpInventory, ProductId, RecordingNotifier,
//! };
//!
//! let config = CartConfig::from_env()?;
//! let inventory = HttpInventory::new(&config.inventory)?;
//! let storage = FileStore::new(&config.storage.dir);
//! let store = CartStore::load(inventory, storage, &config.storage.key)?;
//!
//! let cart = CartContext::new(store, RecordingNotifier::new());
//! if cart.add_product(ProductId::new(1)).await.is_err() {
//!     for notice in cart.notifier().take() {
//!         eprintln!("{notice}");
//!     }
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod context;
pub mod inventory;
pub mod notice;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{CartConfig, ConfigError, InventoryConfig, StorageConfig};
pub use context::CartContext;
pub use inventory::{HttpInventory, Inventory, InventoryError};
pub use notice::{Notice, Notifier, Operation, RecordingNotifier};
pub use storage::{FileStore, MemoryStore, PersistentStore, StorageError};
pub use store::{CartError, CartStore, UpdateProductAmount};

pub use rocketshoes_core::{Cart, CatalogProduct, Product, ProductId, Stock};
