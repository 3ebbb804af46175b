use crate::domain::events::DomainEvent;
use crate::shared::events::{BusStats, Subscription};

/// In-process multicast of domain events
///
/// Every event is replicated to every live subscription. Publishing never
/// blocks and never fails the producer; delivery is best-effort.
pub trait EventBus: Send + Sync {
    /// Publish an event to all current subscribers
    fn publish(&self, event: DomainEvent);

    /// Register a new subscription that observes events published from now on
    fn subscribe(&self) -> Subscription;

    /// Number of live subscriptions
    fn subscriber_count(&self) -> usize;

    /// Snapshot of the bus counters
    fn stats(&self) -> BusStats;
}
