//! HTTP route handlers grouped by resource.

pub mod carts;
pub mod catalog;
pub mod inventory;
pub mod observability;
pub mod orders;
pub mod promotions;
