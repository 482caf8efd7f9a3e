//! Shared application state and registry lookups.

use std::collections::HashMap;

use checkout::CheckoutCoordinator;
use common::{OrderId, ProductId, UserId};
use domain::{Cart, Order, Product, User};
use tokio::sync::{Mutex, RwLock};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
///
/// Registries are locked in declaration order when more than one is held.
pub struct AppState {
    pub checkout: CheckoutCoordinator,
    pub products: RwLock<HashMap<ProductId, Product>>,
    pub users: RwLock<HashMap<UserId, User>>,
    pub carts: Mutex<HashMap<UserId, Cart>>,
    /// Live orders; the history view holds read copies.
    pub orders: Mutex<HashMap<OrderId, Order>>,
}

impl AppState {
    pub fn new(checkout: CheckoutCoordinator) -> Self {
        Self {
            checkout,
            products: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            carts: Mutex::new(HashMap::new()),
            orders: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up a registered product handle.
    pub async fn product(&self, id: &str) -> Result<Product, ApiError> {
        self.products
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Product", id))
    }

    /// Looks up a registered user.
    pub async fn user(&self, id: &str) -> Result<User, ApiError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("User", id))
    }
}
