//! Cart commands.
//!
//! Each command loads the cart from the file store, runs at most one
//! operation, prints any notice to stderr and the resulting cart to stdout.

use std::io::{self, Write};

use rocketshoes_cart::{
    Cart, CartConfig, CartContext, CartError, CartStore, FileStore, HttpInventory,
    RecordingNotifier, UpdateProductAmount,
};
use rocketshoes_core::ProductId;

use super::CommandError;

/// Cart backed by the HTTP inventory service and the local file store.
pub type LocalCart = CartContext<HttpInventory, FileStore, RecordingNotifier>;

/// Open the persisted cart described by `config`.
///
/// # Errors
///
/// Returns `CommandError` if the inventory client cannot be built or the
/// persisted cart cannot be read.
pub fn open(config: &CartConfig) -> Result<LocalCart, CommandError> {
    let inventory = HttpInventory::new(&config.inventory)?;
    let storage = FileStore::new(&config.storage.dir);
    let store = CartStore::load(inventory, storage, config.storage.key.as_str())?;
    tracing::debug!(
        dir = %config.storage.dir.display(),
        products = store.cart().len(),
        "Opened cart"
    );
    Ok(CartContext::new(store, RecordingNotifier::new()))
}

pub async fn show(cart: &LocalCart) -> Result<(), CommandError> {
    render_cart(&cart.snapshot().await, &mut io::stdout().lock())?;
    Ok(())
}

pub async fn add(cart: &LocalCart, product_id: ProductId) -> Result<(), CommandError> {
    let result = cart.add_product(product_id).await;
    finish(cart, result).await
}

pub async fn remove(cart: &LocalCart, product_id: ProductId) -> Result<(), CommandError> {
    let result = cart.remove_product(product_id).await;
    finish(cart, result).await
}

pub async fn update(
    cart: &LocalCart,
    product_id: ProductId,
    amount: u32,
) -> Result<(), CommandError> {
    let result = cart
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    finish(cart, result).await
}

/// Print notices and the cart, then surface the operation's result.
async fn finish(cart: &LocalCart, result: Result<(), CartError>) -> Result<(), CommandError> {
    {
        let mut stderr = io::stderr().lock();
        for notice in cart.notifier().take() {
            writeln!(stderr, "error: {notice}")?;
        }
    }

    render_cart(&cart.snapshot().await, &mut io::stdout().lock())?;
    result.map_err(CommandError::from)
}

/// Write a human-readable listing of the cart.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render_cart<W: Write>(cart: &Cart, out: &mut W) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Cart is empty");
    }

    for product in cart {
        writeln!(
            out,
            "#{:<6} {:>3} x {}",
            product.id.as_i64(),
            product.amount,
            product.title
        )?;
    }
    writeln!(
        out,
        "{} product(s), {} item(s)",
        cart.len(),
        cart.total_quantity()
    )
}
