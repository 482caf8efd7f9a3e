//! Checkout error types.

use common::OrderId;
use domain::{DomainError, Shortfall};
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request violated a domain precondition.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Stock could not cover every line; the order was cancelled.
    #[error("Insufficient stock for order {order_id}: {} line(s) short", shortfalls.len())]
    InsufficientStock {
        order_id: OrderId,
        shortfalls: Vec<Shortfall>,
    },
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
