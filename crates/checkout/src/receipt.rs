//! Priced output of a checkout.

use common::ProductId;
use domain::Order;
use serde::Serialize;

/// One line priced for a specific buyer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    /// Unit price before discounts.
    pub list_price: f64,
    /// Unit price after promotional and tier discounts.
    pub unit_price: f64,
    pub line_total: f64,
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// The placed order, already reserved.
    pub order: Order,
    /// Priced lines ordered by product ID.
    pub lines: Vec<PricedLine>,
    /// Sum of the discounted line totals.
    pub amount_due: f64,
}

impl Receipt {
    /// Returns how much the discounts saved against the order's list total.
    pub fn savings(&self) -> f64 {
        self.order.total() - self.amount_due
    }
}
