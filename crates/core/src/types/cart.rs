//! The cart: an ordered list of products, one entry per identifier.
//!
//! Structural invariants (unique identifiers, every amount at least 1) are
//! enforced on construction and deserialization. The stock upper bound is
//! not a property of the cart; it is checked when the cart is mutated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::Product;

/// Violations of the cart's structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// The same product appears more than once.
    #[error("Duplicate product in cart: {0}")]
    DuplicateProduct(ProductId),

    /// A product is held with a quantity of zero.
    #[error("Product {0} has a zero amount")]
    ZeroAmount(ProductId),
}

/// Ordered cart contents. Insertion order is the order products were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    products: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a cart from a list of products, validating invariants.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError` if an identifier repeats or an amount is zero.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CartInvariantError> {
        for (index, product) in products.iter().enumerate() {
            if product.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(product.id));
            }
            if products.iter().take(index).any(|p| p.id == product.id) {
                return Err(CartInvariantError::DuplicateProduct(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Quantity held for a product, zero when absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |p| p.amount)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Sum of all held quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.amount)).sum()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Product] {
        &self.products
    }

    /// New cart with `product` appended.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError` if the product is already present or
    /// its amount is zero.
    pub fn with_appended(&self, product: Product) -> Result<Self, CartInvariantError> {
        if product.amount == 0 {
            return Err(CartInvariantError::ZeroAmount(product.id));
        }
        if self.contains(product.id) {
            return Err(CartInvariantError::DuplicateProduct(product.id));
        }
        let mut products = self.products.clone();
        products.push(product);
        Ok(Self { products })
    }

    /// New cart with the entry for `id` set to `amount`, keeping its position.
    ///
    /// Returns `None` if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError::ZeroAmount` if `amount` is zero.
    pub fn with_amount(
        &self,
        id: ProductId,
        amount: u32,
    ) -> Result<Option<Self>, CartInvariantError> {
        if amount == 0 {
            return Err(CartInvariantError::ZeroAmount(id));
        }
        if !self.contains(id) {
            return Ok(None);
        }
        let products = self
            .products
            .iter()
            .map(|p| if p.id == id { p.with_amount(amount) } else { p.clone() })
            .collect();
        Ok(Some(Self { products }))
    }

    /// New cart without the entry for `id`, or `None` if it is not present.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let products = self
            .products
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        Some(Self { products })
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = CartInvariantError;

    fn try_from(products: Vec<Product>) -> Result<Self, Self::Error> {
        Self::from_products(products)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.products
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
