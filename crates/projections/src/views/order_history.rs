//! Order history read model: every recorded order, grouped by customer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::{OrderId, UserId};
use domain::{Order, OrderObserver, OrderStatus};

use crate::read_model::ReadModel;

/// Internal state for the order history view.
#[derive(Default)]
struct OrderHistoryState {
    orders: HashMap<OrderId, Order>,
    /// Order IDs per customer in recording order.
    by_user: HashMap<UserId, Vec<OrderId>>,
}

/// Read model view for orders placed by each customer.
///
/// Stores a copy of each recorded order. Registered as an [`OrderObserver`],
/// it applies status changes to the stored copies; it never mutates the
/// orders it is given.
#[derive(Clone, Default)]
pub struct OrderHistoryView {
    state: Arc<RwLock<OrderHistoryState>>,
}

impl OrderHistoryView {
    /// Creates a new empty order history view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an order under its owner's ID.
    ///
    /// Recording an order ID again replaces the stored copy, moving it to the
    /// new owner's history if the owner differs.
    pub fn record(&self, order: &Order) {
        let mut state = self.write();
        let owner = order.owner().id();
        let previous = state.orders.insert(order.id().clone(), order.clone());

        let indexed_under_owner = match &previous {
            Some(previous) if previous.owner().id() == owner => true,
            Some(previous) => {
                let previous_owner = previous.owner().id().clone();
                if let Some(ids) = state.by_user.get_mut(&previous_owner) {
                    ids.retain(|id| id != order.id());
                }
                false
            }
            None => false,
        };
        if !indexed_under_owner {
            state
                .by_user
                .entry(owner.clone())
                .or_default()
                .push(order.id().clone());
        }
        tracing::debug!(order_id = %order.id(), user_id = %owner, "order recorded");
    }

    /// Gets a specific order.
    pub fn get_order(&self, order_id: &OrderId) -> Option<Order> {
        self.read().orders.get(order_id).cloned()
    }

    /// Gets all orders for a customer, oldest first.
    pub fn orders_for(&self, user_id: &UserId) -> Vec<Order> {
        self.collect_for(user_id, |_| true)
    }

    /// Gets a customer's orders currently in `status`.
    pub fn orders_for_by_status(&self, user_id: &UserId, status: OrderStatus) -> Vec<Order> {
        self.collect_for(user_id, |order| order.status() == status)
    }

    /// Sums the captured totals of every order a customer placed.
    pub fn total_spending(&self, user_id: &UserId) -> f64 {
        self.orders_for(user_id).iter().map(Order::total).sum()
    }

    fn collect_for(&self, user_id: &UserId, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        let state = self.read();
        state
            .by_user
            .get(user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.orders.get(id))
            .filter(|order| keep(*order))
            .cloned()
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, OrderHistoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, OrderHistoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OrderObserver for OrderHistoryView {
    fn on_status_change(&self, order: &Order, new_status: OrderStatus) {
        if let Some(stored) = self.write().orders.get_mut(order.id()) {
            stored.set_status(new_status);
        }
    }
}

impl ReadModel for OrderHistoryView {
    fn name(&self) -> &'static str {
        "OrderHistoryView"
    }

    fn count(&self) -> usize {
        self.read().orders.len()
    }

    fn reset(&self) {
        let mut state = self.write();
        state.orders.clear();
        state.by_user.clear();
    }
}
