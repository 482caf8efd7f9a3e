//! Read model trait for query-side views.

/// A read model providing query access to recorded orders.
///
/// Read models are kept current by order status notifications and are
/// never written to by the components they observe.
pub trait ReadModel: Send + Sync {
    /// Returns the name of this read model.
    fn name(&self) -> &'static str;

    /// Returns the number of entries in this read model.
    fn count(&self) -> usize;

    /// Discards every entry.
    fn reset(&self);
}
