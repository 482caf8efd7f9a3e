//! Product catalog entity.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use common::ProductId;

use crate::error::{DomainError, Result};

#[derive(Debug)]
struct ProductInner {
    id: ProductId,
    name: String,
    /// `f64` bit pattern; prices are read far more often than written.
    price_bits: AtomicU64,
}

/// A product that can be sold.
///
/// `Product` is a shared handle: clones refer to the same product, so a price
/// change is visible to every cart and ledger holding it. Identity is the id.
#[derive(Debug, Clone)]
pub struct Product {
    inner: Arc<ProductInner>,
}

impl Product {
    /// Creates a new product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Result<Self> {
        let id = ProductId::parse(id)?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::BlankField {
                field: "Product name",
            });
        }
        validate_price(price)?;

        Ok(Self {
            inner: Arc::new(ProductInner {
                id,
                name,
                price_bits: AtomicU64::new(price.to_bits()),
            }),
        })
    }

    /// Returns the product ID.
    pub fn id(&self) -> &ProductId {
        &self.inner.id
    }

    /// Returns the product name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the current unit price.
    pub fn price(&self) -> f64 {
        f64::from_bits(self.inner.price_bits.load(Ordering::Acquire))
    }

    /// Changes the unit price.
    pub fn set_price(&self, price: f64) -> Result<()> {
        validate_price(price)?;
        self.inner
            .price_bits
            .store(price.to_bits(), Ordering::Release);
        Ok(())
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Product {}

impl std::hash::Hash for Product {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::InvalidPrice { price });
    }
    Ok(())
}
