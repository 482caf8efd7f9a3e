//! Checkout coordinator for turning carts into reserved, priced orders.

use std::sync::Arc;

use domain::{
    Cart, DiscountEngine, InventoryLedger, NotificationService, Order, OrderStatus, Product,
    Subscriber, User,
};
use projections::OrderHistoryView;

use crate::error::{CheckoutError, Result};
use crate::receipt::{PricedLine, Receipt};

/// Orchestrates order placement across the domain components.
///
/// Placement runs: order creation (drains the cart) → history record →
/// all-or-nothing stock reservation → status notification → per-line pricing.
/// A reservation that cannot be met is compensated by restoring the cart and
/// cancelling the order.
pub struct CheckoutCoordinator {
    inventory: InventoryLedger,
    discounts: DiscountEngine,
    notifications: NotificationService,
    history: OrderHistoryView,
}

impl CheckoutCoordinator {
    /// Creates a coordinator and subscribes `history` to status notifications.
    pub fn new(
        inventory: InventoryLedger,
        discounts: DiscountEngine,
        notifications: NotificationService,
        history: OrderHistoryView,
    ) -> Self {
        let subscriber: Subscriber = Arc::new(history.clone());
        notifications.subscribe(subscriber);
        Self {
            inventory,
            discounts,
            notifications,
            history,
        }
    }

    pub fn inventory(&self) -> &InventoryLedger {
        &self.inventory
    }

    pub fn discounts(&self) -> &DiscountEngine {
        &self.discounts
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn history(&self) -> &OrderHistoryView {
        &self.history
    }

    /// Places an order for the contents of `cart`.
    ///
    /// On success the cart is empty and the returned receipt holds the
    /// order in Processing. On insufficient stock the cart is restored,
    /// stock is untouched and the recorded order is Cancelled.
    #[tracing::instrument(skip_all, fields(user_id = %cart.owner().id()))]
    pub fn place_order(&self, order_id: impl Into<String>, cart: &mut Cart) -> Result<Receipt> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = std::time::Instant::now();

        let mut order = Order::from_cart(order_id, cart)?;
        self.history.record(&order);

        let shortfalls = self.inventory.try_reserve(&mut order)?;
        if !shortfalls.is_empty() {
            self.compensate(&mut order, cart)?;

            metrics::counter!("checkout_orders_total", "outcome" => "rejected").increment(1);
            tracing::warn!(order_id = %order.id(), short_lines = shortfalls.len(), "checkout rejected");
            return Err(CheckoutError::InsufficientStock {
                order_id: order.id().clone(),
                shortfalls,
            });
        }
        self.notifications
            .notify_status_change(&order, order.status());

        let lines: Vec<PricedLine> = order
            .lines()
            .map(|line| {
                self.price_line(
                    &line.product,
                    line.quantity,
                    line.unit_price,
                    order.owner(),
                )
            })
            .collect();
        let amount_due: f64 = lines.iter().map(|line| line.line_total).sum();

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        metrics::counter!("checkout_orders_total", "outcome" => "placed").increment(1);
        tracing::info!(order_id = %order.id(), amount_due, duration, "order placed");

        Ok(Receipt {
            order,
            lines,
            amount_due,
        })
    }

    /// Sets an order's status and notifies subscribers.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    pub fn change_status(&self, order: &mut Order, status: OrderStatus) {
        order.set_status(status);
        self.notifications.notify_status_change(order, status);
    }

    /// Prices the contents of a cart for its owner without placing it.
    pub fn quote(&self, cart: &Cart) -> Vec<PricedLine> {
        let mut lines: Vec<PricedLine> = cart
            .lines()
            .map(|line| {
                self.price_line(
                    &line.product,
                    line.quantity,
                    line.product.price(),
                    cart.owner(),
                )
            })
            .collect();
        lines.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        lines
    }

    fn price_line(
        &self,
        product: &Product,
        quantity: i64,
        list_price: f64,
        buyer: &User,
    ) -> PricedLine {
        let unit_price = self.discounts.price_at(list_price, product.id(), buyer);
        PricedLine {
            product_id: product.id().clone(),
            product_name: product.name().to_string(),
            quantity,
            list_price,
            unit_price,
            line_total: unit_price * quantity as f64,
        }
    }

    /// Puts the order's lines back into the cart and cancels the order.
    fn compensate(&self, order: &mut Order, cart: &mut Cart) -> Result<()> {
        for line in order.lines() {
            cart.add_line(&line.product, line.quantity)?;
        }
        self.change_status(order, OrderStatus::Cancelled);
        Ok(())
    }
}
