//! The cart store: owns the cart and applies validated mutations.
//!
//! Every mutation follows the same sequence: validate against the current
//! cart, ask the inventory service for stock where needed, build the new
//! cart, persist it, and only then replace the in-memory cart. A failure at
//! any step leaves both the persisted and the in-memory cart untouched.

use rocketshoes_core::{Cart, CartInvariantError, ProductId};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::inventory::{Inventory, InventoryError};
use crate::storage::{self, PersistentStore, StorageError};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is not available.
    #[error("Product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Quantities below 1 are not accepted.
    #[error("Invalid amount: {0}")]
    InvalidAmount(u32),

    /// The product is not in the cart.
    #[error("Product not in cart: {0}")]
    NotInCart(ProductId),

    /// Inventory lookup failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The new cart would break a structural invariant.
    #[error("Invalid cart: {0}")]
    Invariant(#[from] CartInvariantError),
}

impl CartError {
    /// Whether this is a stock-limit rejection.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        matches!(self, Self::OutOfStock { .. })
    }
}

/// Request to set the quantity of a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: u32,
}

/// Authoritative in-memory cart, synchronized with a persistent store.
pub struct CartStore<I, S> {
    inventory: I,
    storage: S,
    key: String,
    cart: Cart,
}

impl<I, S> CartStore<I, S>
where
    I: Inventory,
    S: PersistentStore,
{
    /// Initialize from whatever is stored under `key` (empty if nothing is).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stored
    /// value is not a valid cart.
    pub fn load(inventory: I, storage: S, key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        let cart = storage::load_cart(&storage, &key)?;
        tracing::debug!(key = %key, products = cart.len(), "Loaded cart");
        Ok(Self {
            inventory,
            storage,
            key,
            cart,
        })
    }

    /// Read-only view of the current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its amount incremented; a new one is
    /// fetched from the catalog and appended with amount 1. The new amount
    /// may equal the available stock but not exceed it.
    ///
    /// # Errors
    ///
    /// - `CartError::OutOfStock` if the new amount would exceed stock
    /// - `CartError::Inventory` if stock or product lookup fails
    /// - `CartError::Storage` if the cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let current = self.cart.amount_of(product_id);
        let requested = current.saturating_add(1);

        let stock = self.inventory.stock(product_id).await?;
        if requested > stock.amount {
            tracing::info!(requested, available = stock.amount, "Add rejected: out of stock");
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let updated = if current > 0 {
            self.cart
                .with_amount(product_id, requested)?
                .ok_or(CartError::NotInCart(product_id))?
        } else {
            let product = self.inventory.product(product_id).await?;
            self.cart.with_appended(product.into_cart_product(1))?
        };

        self.commit(updated)?;
        tracing::info!(amount = requested, "Product added to cart");
        Ok(())
    }

    /// Remove a product entirely.
    ///
    /// # Errors
    ///
    /// - `CartError::NotInCart` if the product is absent
    /// - `CartError::Storage` if the cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let updated = self
            .cart
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(updated)?;
        tracing::info!("Product removed from cart");
        Ok(())
    }

    /// Set the quantity of a product in the cart.
    ///
    /// The requested amount must be strictly below the available stock: a
    /// request equal to the stock level is rejected, unlike
    /// [`add_product`](Self::add_product) which accepts it. Stock is checked
    /// even for a product that is not in the cart; once it passes, an absent
    /// product leaves the cart as it is and the call succeeds.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidAmount` if the amount is below 1
    /// - `CartError::OutOfStock` if stock is not above the requested amount
    /// - `CartError::Inventory` if the stock lookup fails
    /// - `CartError::Storage` if the cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(
        &mut self,
        update: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = update;
        if amount < 1 {
            return Err(CartError::InvalidAmount(amount));
        }

        let stock = self.inventory.stock(product_id).await?;
        if stock.amount <= amount {
            tracing::info!(available = stock.amount, "Update rejected: out of stock");
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let Some(updated) = self.cart.with_amount(product_id, amount)? else {
            tracing::debug!("Product not in cart, nothing to update");
            return Ok(());
        };

        self.commit(updated)?;
        tracing::info!("Product amount updated");
        Ok(())
    }

    /// Persist `cart`, then make it the current cart.
    fn commit(&mut self, cart: Cart) -> Result<(), CartError> {
        if let Err(e) = storage::save_cart(&self.storage, &self.key, &cart) {
            tracing::error!(error = %e, key = %self.key, "Failed to persist cart");
            return Err(e.into());
        }
        self.cart = cart;
        Ok(())
    }
}
