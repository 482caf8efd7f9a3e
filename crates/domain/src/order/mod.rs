//! Orders placed from carts.

mod status;

pub use status::OrderStatus;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};

use crate::cart::Cart;
use crate::error::{DomainError, Result};
use crate::product::Product;
use crate::user::User;

/// A line of an order, frozen when the order was created.
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// The product ordered.
    pub product: Product,

    /// Quantity ordered.
    pub quantity: i64,

    /// Unit price at the moment the order was created.
    pub unit_price: f64,
}

impl OrderLine {
    /// Returns the line total at the captured unit price.
    pub fn total_price(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// An immutable snapshot of a cart with a status lifecycle.
///
/// Lines and total are captured once at creation; later changes to the
/// originating cart or to product prices do not affect them.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    owner: User,
    lines: BTreeMap<ProductId, OrderLine>,
    total: f64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order from the contents of `cart` and empties the cart.
    ///
    /// Fails if `id` is blank or the cart is empty; the cart is untouched on failure.
    pub fn from_cart(id: impl Into<String>, cart: &mut Cart) -> Result<Self> {
        let id = OrderId::parse(id)?;
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let lines = cart
            .lines()
            .map(|line| {
                (
                    line.product.id().clone(),
                    OrderLine {
                        product: line.product.clone(),
                        quantity: line.quantity,
                        unit_price: line.product.price(),
                    },
                )
            })
            .collect();

        let order = Self {
            id,
            owner: cart.owner().clone(),
            lines,
            total: cart.total(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        cart.clear();
        tracing::debug!(order_id = %order.id, lines = order.lines.len(), total = order.total, "order created");
        Ok(order)
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Returns the user who placed the order.
    pub fn owner(&self) -> &User {
        &self.owner
    }

    /// Returns the order lines ordered by product ID.
    pub fn lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.values()
    }

    /// Returns the line for a product, if ordered.
    pub fn get_line(&self, product_id: &ProductId) -> Option<&OrderLine> {
        self.lines.get(product_id)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    /// Returns the total captured at creation.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Overwrites the status. Transition legality is left to the caller.
    pub fn set_status(&mut self, status: OrderStatus) {
        tracing::debug!(order_id = %self.id, from = %self.status, to = %status, "order status changed");
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_with(lines: &[(&Product, i64)]) -> Cart {
        let user = User::new("user-1", "alice", "alice@example.com").unwrap();
        let mut cart = Cart::new(user);
        for (product, quantity) in lines {
            cart.add_line(product, *quantity).unwrap();
        }
        cart
    }

    #[test]
    fn test_from_cart_snapshots_and_clears() {
        let widget = Product::new("SKU-001", "Widget", 10.0).unwrap();
        let gadget = Product::new("SKU-002", "Gadget", 2.5).unwrap();
        let mut cart = cart_with(&[(&widget, 2), (&gadget, 4)]);

        let order = Order::from_cart("ORD-1", &mut cart).unwrap();

        assert_eq!(order.id().as_str(), "ORD-1");
        assert_eq!(order.owner().id().as_str(), "user-1");
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.line_count(), 2);
        assert_eq!(order.total_quantity(), 6);
        assert_eq!(order.total(), 30.0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_are_sorted_by_product_id() {
        let b = Product::new("B", "Bee", 1.0).unwrap();
        let a = Product::new("A", "Ay", 1.0).unwrap();
        let mut cart = cart_with(&[(&b, 1), (&a, 1)]);

        let order = Order::from_cart("ORD-1", &mut cart).unwrap();
        let ids: Vec<&str> = order.lines().map(|l| l.product.id().as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn test_empty_cart_fails() {
        let mut cart = cart_with(&[]);
        assert_eq!(
            Order::from_cart("ORD-1", &mut cart).unwrap_err(),
            DomainError::EmptyCart
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_blank_id_leaves_cart_untouched() {
        let widget = Product::new("SKU-001", "Widget", 10.0).unwrap();
        let mut cart = cart_with(&[(&widget, 2)]);

        assert!(matches!(
            Order::from_cart("  ", &mut cart),
            Err(DomainError::BlankId(_))
        ));
        assert_eq!(cart.quantity_of(widget.id()), 2);
    }

    #[test]
    fn test_total_is_frozen_after_price_change() {
        let widget = Product::new("SKU-001", "Widget", 10.0).unwrap();
        let mut cart = cart_with(&[(&widget, 3)]);
        let order = Order::from_cart("ORD-1", &mut cart).unwrap();

        widget.set_price(99.0).unwrap();

        assert_eq!(order.total(), 30.0);
        let line = order.get_line(widget.id()).unwrap();
        assert_eq!(line.unit_price, 10.0);
        assert_eq!(line.total_price(), 30.0);
    }

    #[test]
    fn test_snapshot_is_independent_of_cart() {
        let widget = Product::new("SKU-001", "Widget", 10.0).unwrap();
        let mut cart = cart_with(&[(&widget, 1)]);
        let order = Order::from_cart("ORD-1", &mut cart).unwrap();

        cart.add_line(&widget, 5).unwrap();

        assert_eq!(order.get_line(widget.id()).unwrap().quantity, 1);
    }

    #[test]
    fn test_set_status_allows_any_transition() {
        let widget = Product::new("SKU-001", "Widget", 10.0).unwrap();
        let mut cart = cart_with(&[(&widget, 1)]);
        let mut order = Order::from_cart("ORD-1", &mut cart).unwrap();

        order.set_status(OrderStatus::Delivered);
        order.set_status(OrderStatus::Pending);
        assert_eq!(order.status(), OrderStatus::Pending);
    }
}
