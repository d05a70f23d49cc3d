//! CLI command implementations.

pub mod cart;

use rocketshoes_cart::{CartError, InventoryError, StorageError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The inventory client could not be created.
    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),

    /// The persisted cart could not be loaded.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A cart operation failed (already reported as a notice).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
