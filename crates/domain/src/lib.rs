//! Domain layer for the order pipeline.
//!
//! This crate provides the core entities and the three collaborating components:
//! - [`DiscountEngine`] pricing products by promotion and customer tier
//! - [`InventoryLedger`] holding stock and reserving it for whole orders
//! - [`Order`] snapshots of a [`Cart`] with a status lifecycle
//!
//! plus the [`NotificationService`] used to fan out status changes.

pub mod cart;
pub mod discount;
pub mod error;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use common::{OrderId, ProductId, UserId};
pub use discount::DiscountEngine;
pub use error::{DomainError, Result};
pub use inventory::{InventoryLedger, Shortfall};
pub use notification::{NotificationService, OrderObserver, Subscriber};
pub use order::{Order, OrderLine, OrderStatus};
pub use product::Product;
pub use user::{Tier, User};
