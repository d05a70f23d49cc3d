//! Persistent key-value storage for the cart.
//!
//! The cart is stored as a JSON array under a single string key, read once
//! when the store is loaded and overwritten after every successful change.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use rocketshoes_core::Cart;
use thiserror::Error;

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored value is not a valid cart.
    #[error("Stored cart under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The cart could not be serialized.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A previous writer panicked while holding the lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
pub trait PersistentStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read the cart stored under `key`, or an empty cart if nothing is stored.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the stored value does not parse as a
/// valid cart.
pub fn load_cart<S: PersistentStore + ?Sized>(storage: &S, key: &str) -> Result<Cart, StorageError> {
    let Some(raw) = storage.get(key)? else {
        return Ok(Cart::new());
    };
    serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })
}

/// Serialize `cart` and write it under `key`.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub fn save_cart<S: PersistentStore + ?Sized>(
    storage: &S,
    key: &str,
    cart: &Cart,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(cart).map_err(StorageError::Serialize)?;
    storage.set(key, &raw)
}
