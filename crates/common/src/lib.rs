//! Shared identifier types for the order pipeline.

pub mod types;

pub use types::{BlankIdError, OrderId, ProductId, UserId};
