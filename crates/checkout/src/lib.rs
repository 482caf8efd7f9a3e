//! Checkout orchestration for the order pipeline.
//!
//! This crate drives the domain components through order placement:
//! 1. Create the order from the cart (draining it)
//! 2. Reserve stock for every line, all or nothing
//! 3. Notify subscribers of the status change
//! 4. Price each line for the buyer
//!
//! If the reservation cannot be met, the cart is restored and the order cancelled.

pub mod coordinator;
pub mod error;
pub mod receipt;

pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, Result};
pub use receipt::{PricedLine, Receipt};
