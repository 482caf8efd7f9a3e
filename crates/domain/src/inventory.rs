//! Inventory ledger: authoritative stock counts and order reservation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::ProductId;

use crate::error::{DomainError, Result};
use crate::order::{Order, OrderStatus};
use crate::product::Product;

/// A line of an order that the ledger cannot currently satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub product_id: ProductId,
    pub available: i64,
    pub requested: i64,
}

/// Stock and catalog entries always exist together.
#[derive(Debug, Default)]
struct LedgerState {
    stock: HashMap<ProductId, i64>,
    catalog: HashMap<ProductId, Product>,
}

impl LedgerState {
    fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.stock.get(product_id).copied().unwrap_or(0)
    }

    fn shortfalls(&self, order: &Order) -> Vec<Shortfall> {
        order
            .lines()
            .filter_map(|line| {
                let available = self.quantity_of(line.product.id());
                (available < line.quantity).then(|| Shortfall {
                    product_id: line.product.id().clone(),
                    available,
                    requested: line.quantity,
                })
            })
            .collect()
    }
}

/// Tracks on-hand quantity per product and reserves stock for orders.
///
/// All state sits behind one mutex, so a [`reserve`](Self::reserve) call runs
/// its check and commit phases without interleaving with any other call.
/// Cloning yields a handle onto the same ledger.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InventoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`, registering it if new.
    pub fn add_stock(&self, product: &Product, quantity: i64) -> Result<()> {
        if quantity < 0 {
            return Err(DomainError::InvalidQuantity {
                quantity,
                requirement: "non-negative",
            });
        }

        let mut state = self.lock();
        let current = state.quantity_of(product.id());
        let updated = current
            .checked_add(quantity)
            .ok_or(DomainError::InvalidQuantity {
                quantity,
                requirement: "small enough to add to current stock",
            })?;

        state
            .catalog
            .insert(product.id().clone(), product.clone());
        state.stock.insert(product.id().clone(), updated);
        tracing::debug!(product_id = %product.id(), added = quantity, on_hand = updated, "stock added");
        Ok(())
    }

    /// Removes a product and its stock from the ledger.
    pub fn remove_product(&self, product: &Product) -> Result<()> {
        let mut state = self.lock();
        if state.catalog.remove(product.id()).is_none() {
            return Err(DomainError::NotInInventory {
                product_id: product.id().clone(),
            });
        }
        state.stock.remove(product.id());
        tracing::debug!(product_id = %product.id(), "product removed from inventory");
        Ok(())
    }

    /// Returns the on-hand quantity, 0 for unknown products.
    pub fn quantity_of(&self, product: &Product) -> i64 {
        self.lock().quantity_of(product.id())
    }

    /// Returns true if at least one unit is on hand.
    pub fn in_stock(&self, product: &Product) -> bool {
        self.quantity_of(product) > 0
    }

    /// Returns the registered product with the given ID.
    pub fn product(&self, product_id: &str) -> Option<Product> {
        self.lock().catalog.get(product_id).cloned()
    }

    /// Returns the number of products registered.
    pub fn product_count(&self) -> usize {
        self.lock().catalog.len()
    }

    /// Lists the order lines whose requested quantity exceeds stock on hand.
    pub fn shortfalls(&self, order: &Order) -> Vec<Shortfall> {
        self.lock().shortfalls(order)
    }

    /// Reserves stock for every line of `order`, all or nothing.
    ///
    /// Returns `Ok(false)` without touching stock or the order when any line
    /// is short. On success every line is decremented and the order moves
    /// to [`OrderStatus::Processing`].
    pub fn reserve(&self, order: &mut Order) -> Result<bool> {
        Ok(self.try_reserve(order)?.is_empty())
    }

    /// Like [`reserve`](Self::reserve), but reports the short lines seen by
    /// the check phase. An empty list means the order was reserved.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    pub fn try_reserve(&self, order: &mut Order) -> Result<Vec<Shortfall>> {
        if order.line_count() == 0 {
            return Err(DomainError::EmptyOrder);
        }

        let mut state = self.lock();

        let shortfalls = state.shortfalls(order);
        if !shortfalls.is_empty() {
            metrics::counter!("inventory_reservations_total", "outcome" => "rejected")
                .increment(1);
            tracing::info!(short_lines = shortfalls.len(), "reservation rejected: insufficient stock");
            return Ok(shortfalls);
        }

        for line in order.lines() {
            if let Some(on_hand) = state.stock.get_mut(line.product.id()) {
                *on_hand -= line.quantity;
            }
        }
        order.set_status(OrderStatus::Processing);

        metrics::counter!("inventory_reservations_total", "outcome" => "reserved").increment(1);
        tracing::info!(lines = order.line_count(), "stock reserved");
        Ok(Vec::new())
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::user::User;

    fn product(id: &str) -> Product {
        Product::new(id, format!("Product {id}"), 10.0).unwrap()
    }

    fn order_for(lines: &[(&Product, i64)]) -> Order {
        let user = User::new("user-1", "alice", "alice@example.com").unwrap();
        let mut cart = Cart::new(user);
        for (product, quantity) in lines {
            cart.add_line(product, *quantity).unwrap();
        }
        Order::from_cart("ORD-1", &mut cart).unwrap()
    }

    #[test]
    fn test_add_stock() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");

        ledger.add_stock(&p1, 10).unwrap();

        assert!(ledger.in_stock(&p1));
        assert_eq!(ledger.quantity_of(&p1), 10);
        assert_eq!(ledger.product("prod1"), Some(p1));
    }

    #[test]
    fn test_add_stock_accumulates() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");

        ledger.add_stock(&p1, 5).unwrap();
        ledger.add_stock(&p1, 3).unwrap();

        assert_eq!(ledger.quantity_of(&p1), 8);
        assert_eq!(ledger.product_count(), 1);
    }

    #[test]
    fn test_zero_stock_registers_but_is_not_in_stock() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");

        ledger.add_stock(&p1, 0).unwrap();

        assert!(!ledger.in_stock(&p1));
        assert!(ledger.product("prod1").is_some());
    }

    #[test]
    fn test_add_negative_stock_fails() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");

        assert!(matches!(
            ledger.add_stock(&p1, -1),
            Err(DomainError::InvalidQuantity { quantity: -1, .. })
        ));
        assert_eq!(ledger.product_count(), 0);
    }

    #[test]
    fn test_unknown_product_has_zero_quantity() {
        let ledger = InventoryLedger::new();
        assert_eq!(ledger.quantity_of(&product("ghost")), 0);
        assert!(!ledger.in_stock(&product("ghost")));
    }

    #[test]
    fn test_remove_product() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        let p2 = product("prod2");
        ledger.add_stock(&p1, 10).unwrap();
        ledger.add_stock(&p2, 5).unwrap();

        ledger.remove_product(&p1).unwrap();

        assert!(!ledger.in_stock(&p1));
        assert!(ledger.product("prod1").is_none());
        assert!(ledger.in_stock(&p2));
    }

    #[test]
    fn test_remove_product_twice_fails_both_times() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        ledger.add_stock(&p1, 1).unwrap();
        ledger.remove_product(&p1).unwrap();

        let first = ledger.remove_product(&p1).unwrap_err();
        let second = ledger.remove_product(&p1).unwrap_err();
        assert!(matches!(first, DomainError::NotInInventory { .. }));
        assert_eq!(first, second);
    }

    #[test]
    fn test_reserve_decrements_every_line() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        let p2 = product("prod2");
        ledger.add_stock(&p1, 10).unwrap();
        ledger.add_stock(&p2, 5).unwrap();
        let mut order = order_for(&[(&p1, 5), (&p2, 3)]);

        assert!(ledger.reserve(&mut order).unwrap());

        assert_eq!(ledger.quantity_of(&p1), 5);
        assert_eq!(ledger.quantity_of(&p2), 2);
        assert_eq!(order.status(), OrderStatus::Processing);
    }

    #[test]
    fn test_reserve_exact_stock_leaves_zero() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        ledger.add_stock(&p1, 4).unwrap();
        let mut order = order_for(&[(&p1, 4)]);

        assert!(ledger.reserve(&mut order).unwrap());
        assert_eq!(ledger.quantity_of(&p1), 0);
        assert!(!ledger.in_stock(&p1));
    }

    #[test]
    fn test_reserve_is_all_or_nothing() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        let p2 = product("prod2");
        ledger.add_stock(&p1, 3).unwrap();
        ledger.add_stock(&p2, 5).unwrap();
        let mut order = order_for(&[(&p1, 5), (&p2, 3)]);

        assert!(!ledger.reserve(&mut order).unwrap());

        assert_eq!(ledger.quantity_of(&p1), 3);
        assert_eq!(ledger.quantity_of(&p2), 5);
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_reserve_unknown_product_is_rejected() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        let mut order = order_for(&[(&p1, 1)]);

        assert!(!ledger.reserve(&mut order).unwrap());
        assert_eq!(ledger.product_count(), 0);
    }

    #[test]
    fn test_shortfalls_lists_short_lines() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        let p2 = product("prod2");
        ledger.add_stock(&p1, 3).unwrap();
        ledger.add_stock(&p2, 5).unwrap();
        let order = order_for(&[(&p1, 5), (&p2, 3)]);

        assert_eq!(
            ledger.shortfalls(&order),
            vec![Shortfall {
                product_id: p1.id().clone(),
                available: 3,
                requested: 5,
            }]
        );
    }

    #[test]
    fn test_try_reserve_reports_short_lines_from_check_phase() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        let p2 = product("prod2");
        ledger.add_stock(&p1, 1).unwrap();
        ledger.add_stock(&p2, 5).unwrap();
        let mut order = order_for(&[(&p1, 2), (&p2, 1)]);

        let short = ledger.try_reserve(&mut order).unwrap();

        assert_eq!(
            short,
            vec![Shortfall {
                product_id: p1.id().clone(),
                available: 1,
                requested: 2,
            }]
        );
        assert_eq!(ledger.quantity_of(&p2), 5);
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_try_reserve_success_returns_no_shortfalls() {
        let ledger = InventoryLedger::new();
        let p1 = product("prod1");
        ledger.add_stock(&p1, 2).unwrap();
        let mut order = order_for(&[(&p1, 2)]);

        assert!(ledger.try_reserve(&mut order).unwrap().is_empty());
        assert_eq!(ledger.quantity_of(&p1), 0);
        assert_eq!(order.status(), OrderStatus::Processing);
    }

    #[test]
    fn test_clones_share_stock() {
        let ledger = InventoryLedger::new();
        let handle = ledger.clone();
        let p1 = product("prod1");

        handle.add_stock(&p1, 7).unwrap();
        assert_eq!(ledger.quantity_of(&p1), 7);
    }
}
