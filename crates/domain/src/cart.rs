//! Shopping cart.

use std::collections::HashMap;

use common::ProductId;

use crate::error::{DomainError, Result};
use crate::product::Product;
use crate::user::User;

/// A product and the quantity of it in a cart.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
}

impl CartLine {
    /// Returns the line total at the product's current price.
    pub fn total_price(&self) -> f64 {
        self.product.price() * self.quantity as f64
    }
}

/// A per-user basket of products.
///
/// Lines are keyed by product ID and quantities are always positive.
#[derive(Debug, Clone)]
pub struct Cart {
    owner: User,
    lines: HashMap<ProductId, CartLine>,
}

impl Cart {
    /// Creates an empty cart owned by `owner`.
    pub fn new(owner: User) -> Self {
        Self {
            owner,
            lines: HashMap::new(),
        }
    }

    pub fn owner(&self) -> &User {
        &self.owner
    }

    /// Returns all lines in the cart.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Returns the quantity of a product in the cart, 0 if absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.lines.get(product_id).map_or(0, |line| line.quantity)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity {
                quantity,
                requirement: "positive",
            });
        }

        match self.lines.get_mut(product.id()) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity).ok_or(
                    DomainError::InvalidQuantity {
                        quantity,
                        requirement: "small enough to merge into the existing line",
                    },
                )?;
            }
            None => {
                self.lines.insert(
                    product.id().clone(),
                    CartLine {
                        product: product.clone(),
                        quantity,
                    },
                );
            }
        }
        Ok(())
    }

    /// Removes a product's line entirely.
    pub fn remove_line(&mut self, product: &Product) -> Result<()> {
        self.lines
            .remove(product.id())
            .map(|_| ())
            .ok_or_else(|| DomainError::NotInCart {
                product_id: product.id().clone(),
            })
    }

    /// Returns the sum of `price * quantity` using each product's current price.
    pub fn total(&self) -> f64 {
        self.lines.values().map(CartLine::total_price).sum()
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
