//! Shared cart handle.
//!
//! `CartContext` is what the rest of an application holds: a cheaply
//! clonable handle to one `CartStore`, plus the notifier failures are
//! reported to. Mutations are serialized through an async mutex, so
//! overlapping calls each see the result of the previous one.

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use tokio::sync::Mutex;

use crate::inventory::Inventory;
use crate::notice::{Notice, Notifier, Operation};
use crate::storage::PersistentStore;
use crate::store::{CartError, CartStore, UpdateProductAmount};

/// Clonable handle to a shared cart store.
pub struct CartContext<I, S, N> {
    store: Arc<Mutex<CartStore<I, S>>>,
    notifier: Arc<N>,
}

impl<I, S, N> Clone for CartContext<I, S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<I, S, N> CartContext<I, S, N>
where
    I: Inventory,
    S: PersistentStore,
    N: Notifier,
{
    pub fn new(store: CartStore<I, S>, notifier: N) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            notifier: Arc::new(notifier),
        }
    }

    /// Copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.store.lock().await.cart().clone()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Add one unit of a product, notifying on failure.
    ///
    /// # Errors
    ///
    /// Returns the `CartError` from [`CartStore::add_product`].
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.store.lock().await.add_product(product_id).await;
        self.report(Operation::AddProduct, result)
    }

    /// Remove a product, notifying on failure.
    ///
    /// # Errors
    ///
    /// Returns the `CartError` from [`CartStore::remove_product`].
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.store.lock().await.remove_product(product_id);
        self.report(Operation::RemoveProduct, result)
    }

    /// Set a product's quantity, notifying on failure.
    ///
    /// # Errors
    ///
    /// Returns the `CartError` from [`CartStore::update_product_amount`].
    pub async fn update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let result = self.store.lock().await.update_product_amount(update).await;
        self.report(Operation::UpdateProductAmount, result)
    }

    fn report(&self, operation: Operation, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(error) = &result {
            let notice = Notice::for_failure(operation, error);
            tracing::debug!(?operation, %error, ?notice, "Cart operation failed");
            self.notifier.notify(notice);
        }
        result
    }
}
