//! Fan-out of order status changes to registered subscribers.

use std::sync::{Arc, PoisonError, RwLock};

use crate::order::{Order, OrderStatus};

/// Receives order status change notifications.
pub trait OrderObserver: Send + Sync {
    /// Called after `order` moved to `new_status`.
    fn on_status_change(&self, order: &Order, new_status: OrderStatus);
}

impl<F> OrderObserver for F
where
    F: Fn(&Order, OrderStatus) + Send + Sync,
{
    fn on_status_change(&self, order: &Order, new_status: OrderStatus) {
        self(order, new_status)
    }
}

/// A registered subscriber. Registry membership is by handle identity.
pub type Subscriber = Arc<dyn OrderObserver>;

/// Registry of subscribers invoked synchronously in registration order.
///
/// Cloning yields a handle onto the same registry.
#[derive(Clone, Default)]
pub struct NotificationService {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl NotificationService {
    /// Creates a registry with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Returns false if the handle is already registered.
    pub fn subscribe(&self, subscriber: Subscriber) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if subscribers.iter().any(|s| same_handle(s, &subscriber)) {
            return false;
        }
        subscribers.push(subscriber);
        true
    }

    /// Removes a subscriber. Returns false if the handle was not registered.
    pub fn unsubscribe(&self, subscriber: &Subscriber) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|s| !same_handle(s, subscriber));
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Tells every subscriber that `order` moved to `new_status`.
    pub fn notify_status_change(&self, order: &Order, new_status: OrderStatus) {
        // Snapshot so subscribers may (un)subscribe while being notified.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        tracing::debug!(
            order_id = %order.id(),
            status = %new_status,
            subscribers = subscribers.len(),
            "notifying status change"
        );
        for subscriber in &subscribers {
            subscriber.on_status_change(order, new_status);
        }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn same_handle(a: &Subscriber, b: &Subscriber) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::cart::Cart;
    use crate::product::Product;
    use crate::user::User;

    fn order() -> Order {
        let user = User::new("user-1", "alice", "alice@example.com").unwrap();
        let mut cart = Cart::new(user);
        cart.add_line(&Product::new("SKU-001", "Widget", 1.0).unwrap(), 1)
            .unwrap();
        Order::from_cart("ORD-1", &mut cart).unwrap()
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Subscriber {
        let log = Arc::clone(log);
        Arc::new(move |order: &Order, status: OrderStatus| {
            log.lock()
                .unwrap()
                .push(format!("{name}:{}:{status}", order.id()));
        })
    }

    #[test]
    fn test_notifies_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let service = NotificationService::new();
        service.subscribe(recorder(&log, "first"));
        service.subscribe(recorder(&log, "second"));

        service.notify_status_change(&order(), OrderStatus::Shipped);

        assert_eq!(
            *log.lock().unwrap(),
            ["first:ORD-1:Shipped", "second:ORD-1:Shipped"]
        );
    }

    #[test]
    fn test_duplicate_subscription_is_ignored() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let service = NotificationService::new();
        let subscriber = recorder(&log, "only");

        assert!(service.subscribe(subscriber.clone()));
        assert!(!service.subscribe(subscriber));
        assert_eq!(service.subscriber_count(), 1);

        service.notify_status_change(&order(), OrderStatus::Processing);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unsubscribe_by_identity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let service = NotificationService::new();
        let first = recorder(&log, "first");
        let second = recorder(&log, "second");
        service.subscribe(first.clone());
        service.subscribe(second);

        assert!(service.unsubscribe(&first));
        assert!(!service.unsubscribe(&first));

        service.notify_status_change(&order(), OrderStatus::Cancelled);
        assert_eq!(*log.lock().unwrap(), ["second:ORD-1:Cancelled"]);
    }

    #[test]
    fn test_notify_without_subscribers() {
        let service = NotificationService::new();
        service.notify_status_change(&order(), OrderStatus::Delivered);
        assert_eq!(service.subscriber_count(), 0);
    }
}
