//! Read models over placed orders.
//!
//! This crate provides the query side of the order pipeline:
//! - [`ReadModel`] trait for query access to denormalized data
//! - [`OrderHistoryView`] recording orders per customer, kept current by
//!   subscribing to order status notifications

pub mod read_model;
pub mod views;

pub use read_model::ReadModel;
pub use views::OrderHistoryView;
