//! Domain error types.

use common::{BlankIdError, ProductId};
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// Every variant is an invalid-argument failure: the caller passed input that
/// violates a precondition. Operations that fail leave all state unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// An identifier was empty or whitespace.
    #[error(transparent)]
    BlankId(#[from] BlankIdError),

    /// A required text field was empty or whitespace.
    #[error("{field} cannot be empty")]
    BlankField { field: &'static str },

    /// Price is negative or not a finite number.
    #[error("Invalid price: {price} (must be a non-negative number)")]
    InvalidPrice { price: f64 },

    /// Email address does not contain `@`.
    #[error("Invalid email: {email:?} (must contain @)")]
    InvalidEmail { email: String },

    /// Discount percentage outside `[0, 100]`.
    #[error("Invalid discount percentage: {percentage} (must be between 0 and 100)")]
    InvalidPercentage { percentage: f64 },

    /// Quantity out of range for the operation.
    #[error("Invalid quantity: {quantity} (must be {requirement})")]
    InvalidQuantity {
        quantity: i64,
        requirement: &'static str,
    },

    /// Product is not present in the cart.
    #[error("Product not found in cart: {product_id}")]
    NotInCart { product_id: ProductId },

    /// Product is not known to the inventory ledger.
    #[error("Product not found in inventory: {product_id}")]
    NotInInventory { product_id: ProductId },

    /// An order cannot be created from an empty cart.
    #[error("Cannot create order from empty cart")]
    EmptyCart,

    /// An order with no lines cannot be reserved.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// A textual value did not name a known variant.
    #[error("Unrecognized {kind}: {value:?}")]
    Unrecognized { kind: &'static str, value: String },
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
