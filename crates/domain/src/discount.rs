//! Discount engine: promotional and tier pricing.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::ProductId;

use crate::error::{DomainError, Result};
use crate::product::Product;
use crate::user::User;

#[derive(Debug, Default)]
struct DiscountState {
    promotions: HashMap<ProductId, f64>,
    combination_enabled: bool,
}

/// Computes the price a user pays for a product.
///
/// Two discounts apply: a per-product promotional percentage and the buyer's
/// tier percentage. With combination disabled the larger of the two wins;
/// with combination enabled both are applied as independent factors.
///
/// Cloning yields a handle onto the same promotion table.
#[derive(Debug, Clone, Default)]
pub struct DiscountEngine {
    state: Arc<RwLock<DiscountState>>,
}

impl DiscountEngine {
    /// Creates an engine with no promotions and combination disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the promotional percentage for a product, replacing any previous one.
    pub fn add_promotion(&self, product_id: &str, percentage: f64) -> Result<()> {
        let product_id = ProductId::parse(product_id)?;
        if !(0.0..=100.0).contains(&percentage) {
            return Err(DomainError::InvalidPercentage { percentage });
        }

        tracing::debug!(%product_id, percentage, "promotion set");
        self.write().promotions.insert(product_id, percentage);
        Ok(())
    }

    /// Removes a product's promotion. Removing an absent promotion is a no-op.
    pub fn remove_promotion(&self, product_id: &str) -> Result<()> {
        let product_id = ProductId::parse(product_id)?;
        self.write().promotions.remove(&product_id);
        Ok(())
    }

    /// Chooses between compounding discounts and taking the larger one.
    pub fn set_combination_enabled(&self, enabled: bool) {
        self.write().combination_enabled = enabled;
    }

    pub fn combination_enabled(&self) -> bool {
        self.read().combination_enabled
    }

    /// Returns true if the product has a promotion entry.
    pub fn is_promotional(&self, product_id: &str) -> Result<bool> {
        let product_id = ProductId::parse(product_id)?;
        Ok(self.read().promotions.contains_key(&product_id))
    }

    /// Returns the promotional percentage for a product, 0 if none.
    pub fn promotion_for(&self, product_id: &str) -> Result<f64> {
        let product_id = ProductId::parse(product_id)?;
        Ok(self
            .read()
            .promotions
            .get(&product_id)
            .copied()
            .unwrap_or(0.0))
    }

    /// Returns the price `user` pays for one unit of `product` at its current price.
    pub fn price_for(&self, product: &Product, user: &User) -> f64 {
        self.price_at(product.price(), product.id(), user)
    }

    /// Applies the promotional and tier discounts to a given unit `price`.
    ///
    /// Used to price order snapshots, whose unit prices no longer follow the product.
    pub fn price_at(&self, price: f64, product_id: &ProductId, user: &User) -> f64 {
        let state = self.read();
        let promo = state.promotions.get(product_id).copied().unwrap_or(0.0);
        let tier = user.tier().discount_percent();

        if promo > 0.0 && state.combination_enabled {
            price * (1.0 - promo / 100.0) * (1.0 - tier / 100.0)
        } else if promo > 0.0 {
            price * (1.0 - promo.max(tier) / 100.0)
        } else {
            price * (1.0 - tier / 100.0)
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DiscountState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DiscountState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Tier;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn product() -> Product {
        Product::new("prod1", "Widget", 100.0).unwrap()
    }

    fn regular() -> User {
        User::new("user1", "alice", "alice@example.com").unwrap()
    }

    fn premium() -> User {
        User::with_tier("user2", "bob", "bob@example.com", Tier::Premium).unwrap()
    }

    #[test]
    fn test_regular_tier_discount() {
        let engine = DiscountEngine::new();
        assert_close(engine.price_for(&product(), &regular()), 95.0);
    }

    #[test]
    fn test_premium_tier_discount() {
        let engine = DiscountEngine::new();
        assert_close(engine.price_for(&product(), &premium()), 85.0);
    }

    #[test]
    fn test_promotion_beats_smaller_tier_discount() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 25.0).unwrap();
        assert_close(engine.price_for(&product(), &regular()), 75.0);
    }

    #[test]
    fn test_tier_beats_smaller_promotion() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 10.0).unwrap();
        assert_close(engine.price_for(&product(), &premium()), 85.0);
    }

    #[test]
    fn test_combined_discounts_compound() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 10.0).unwrap();
        engine.set_combination_enabled(true);
        assert_close(engine.price_for(&product(), &premium()), 76.5);
        assert_close(engine.price_for(&product(), &regular()), 85.5);
    }

    #[test]
    fn test_combination_without_promotion_uses_tier_only() {
        let engine = DiscountEngine::new();
        engine.set_combination_enabled(true);
        assert_close(engine.price_for(&product(), &premium()), 85.0);
    }

    #[test]
    fn test_zero_percent_promotion_is_ignored() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 0.0).unwrap();
        engine.set_combination_enabled(true);
        assert_close(engine.price_for(&product(), &regular()), 95.0);
    }

    #[test]
    fn test_full_promotion_is_free() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 100.0).unwrap();
        assert_close(engine.price_for(&product(), &regular()), 0.0);
    }

    #[test]
    fn test_add_promotion_validates() {
        let engine = DiscountEngine::new();
        assert!(matches!(
            engine.add_promotion("", 10.0),
            Err(DomainError::BlankId(_))
        ));
        assert!(matches!(
            engine.add_promotion("prod1", -1.0),
            Err(DomainError::InvalidPercentage { .. })
        ));
        assert!(engine.add_promotion("prod1", 100.1).is_err());
        assert!(engine.add_promotion("prod1", f64::NAN).is_err());
        assert!(!engine.is_promotional("prod1").unwrap());
    }

    #[test]
    fn test_add_promotion_overwrites() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 10.0).unwrap();
        engine.add_promotion("prod1", 30.0).unwrap();
        assert_eq!(engine.promotion_for("prod1").unwrap(), 30.0);
    }

    #[test]
    fn test_remove_promotion() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 40.0).unwrap();
        engine.remove_promotion("prod1").unwrap();
        engine.remove_promotion("prod1").unwrap();

        assert!(!engine.is_promotional("prod1").unwrap());
        assert_close(engine.price_for(&product(), &regular()), 95.0);
        assert!(engine.remove_promotion(" ").is_err());
    }

    #[test]
    fn test_promotion_queries_reject_blank_ids() {
        let engine = DiscountEngine::new();
        assert!(engine.is_promotional("").is_err());
        assert!(engine.promotion_for("").is_err());
        assert_eq!(engine.promotion_for("unknown").unwrap(), 0.0);
    }

    #[test]
    fn test_clones_share_promotions() {
        let engine = DiscountEngine::new();
        let handle = engine.clone();
        handle.add_promotion("prod1", 50.0).unwrap();
        handle.set_combination_enabled(true);

        assert!(engine.is_promotional("prod1").unwrap());
        assert!(engine.combination_enabled());
    }

    #[test]
    fn test_price_at_uses_given_price_not_live_price() {
        let engine = DiscountEngine::new();
        engine.add_promotion("prod1", 20.0).unwrap();
        let widget = product();
        widget.set_price(500.0).unwrap();

        assert_close(engine.price_at(100.0, widget.id(), &regular()), 80.0);
        assert_close(engine.price_for(&widget, &regular()), 400.0);
    }
}
