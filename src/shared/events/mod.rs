pub mod overflow;

pub use overflow::OverflowPolicy;

use crate::domain::events::DomainEvent;
use crate::domain::ports::event_bus::EventBus;
use futures::Stream;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

pub type SubscriptionId = Uuid;

/// Counters exposed for tests and the stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusStats {
    pub subscribers: usize,
    pub published: u64,
    pub dropped: u64,
}

/// Sending half of one subscription's channel
///
/// Only the registry holds it, so removing the entry closes the channel.
enum EventSender {
    /// `broadcast` overwrites the oldest unread event when full
    DropOldest(broadcast::Sender<DomainEvent>),
    /// `try_send` refuses the incoming event when full
    DropLatest(mpsc::Sender<DomainEvent>),
}

enum EventReceiver {
    DropOldest(broadcast::Receiver<DomainEvent>),
    DropLatest(mpsc::Receiver<DomainEvent>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Queued,
    /// Delivered at the cost of one event (evicted or refused)
    Overflowed,
    Closed,
}

fn channel(capacity: usize, policy: OverflowPolicy) -> (EventSender, EventReceiver) {
    match policy {
        OverflowPolicy::DropOldest => {
            let (tx, rx) = broadcast::channel(capacity);
            (EventSender::DropOldest(tx), EventReceiver::DropOldest(rx))
        }
        OverflowPolicy::DropLatest => {
            let (tx, rx) = mpsc::channel(capacity);
            (EventSender::DropLatest(tx), EventReceiver::DropLatest(rx))
        }
    }
}

impl EventSender {
    fn deliver(&self, event: DomainEvent, capacity: usize) -> Delivery {
        match self {
            EventSender::DropOldest(tx) => {
                let evicts = tx.len() >= capacity;
                match tx.send(event) {
                    Ok(_) if evicts => Delivery::Overflowed,
                    Ok(_) => Delivery::Queued,
                    Err(_) => Delivery::Closed,
                }
            }
            EventSender::DropLatest(tx) => match tx.try_send(event) {
                Ok(()) => Delivery::Queued,
                Err(TrySendError::Full(_)) => Delivery::Overflowed,
                Err(TrySendError::Closed(_)) => Delivery::Closed,
            },
        }
    }

    fn buffered(&self) -> usize {
        match self {
            EventSender::DropOldest(tx) => tx.len(),
            EventSender::DropLatest(tx) => tx.max_capacity() - tx.capacity(),
        }
    }
}

struct SubscriberSlot {
    sender: EventSender,
    dropped: Arc<AtomicU64>,
}

struct Registry {
    subscribers: RwLock<HashMap<SubscriptionId, SubscriberSlot>>,
    published: AtomicU64,
    dropped: AtomicU64,
}

impl Registry {
    fn remove(&self, id: SubscriptionId) -> bool {
        let (removed, remaining) = {
            let mut subscribers = self.subscribers.write();
            let removed = subscribers.remove(&id).is_some();
            let remaining = subscribers.len();
            if removed {
                metrics::gauge!("gymflow_event_subscriptions_active").set(remaining as f64);
            }
            (removed, remaining)
        };

        if removed {
            tracing::info!(
                "Subscriber {} disconnected ({} remaining)",
                id,
                remaining
            );
        }
        removed
    }

    fn buffered(&self, id: SubscriptionId) -> Option<usize> {
        self.subscribers
            .read()
            .get(&id)
            .map(|slot| slot.sender.buffered())
    }
}

struct SubscriptionState {
    id: SubscriptionId,
    registry: Weak<Registry>,
    dropped: Arc<AtomicU64>,
    cancelled: AtomicBool,
}

impl SubscriptionState {
    fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn buffered(&self) -> usize {
        if self.is_cancelled() {
            return 0;
        }
        self.registry
            .upgrade()
            .and_then(|registry| registry.buffered(self.id))
            .unwrap_or(0)
    }
}

/// One consumer's independent view of the bus
///
/// Dropping the subscription unsubscribes it.
pub struct Subscription {
    receiver: EventReceiver,
    state: Arc<SubscriptionState>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.state.id
    }

    /// Next event in publish order; `None` once cancelled
    pub async fn recv(&mut self) -> Option<DomainEvent> {
        if self.state.is_cancelled() {
            return None;
        }

        match &mut self.receiver {
            EventReceiver::DropOldest(rx) => loop {
                match rx.recv().await {
                    Ok(event) => return Some(event),
                    // Evictions were counted when published
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::trace!("Subscriber {} skipped {} events", self.state.id, skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            },
            EventReceiver::DropLatest(rx) => rx.recv().await,
        }
    }

    pub fn try_recv(&mut self) -> Option<DomainEvent> {
        if self.state.is_cancelled() {
            return None;
        }

        match &mut self.receiver {
            EventReceiver::DropOldest(rx) => loop {
                match rx.try_recv() {
                    Ok(event) => return Some(event),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => return None,
                }
            },
            EventReceiver::DropLatest(rx) => rx.try_recv().ok(),
        }
    }

    /// Events waiting in this subscription's buffer
    pub fn buffered(&self) -> usize {
        self.state.buffered()
    }

    /// Events this subscription lost to the overflow policy
    pub fn dropped(&self) -> u64 {
        self.state.dropped.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// Unregister from the bus and stop buffering. Idempotent.
    pub fn cancel(&self) {
        self.state.cancel();
    }

    /// Detached handle that can cancel this subscription from elsewhere
    pub fn handle(&self) -> SubscriptionHandle {
        SubscriptionHandle {
            state: self.state.clone(),
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = DomainEvent> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription
                .recv()
                .await
                .map(|event| (event, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.state.cancel();
    }
}

/// Cancellation and introspection handle; does not cancel on drop
///
/// Cancelling closes the subscription's channel, so a pending `recv`
/// returns `None`.
#[derive(Clone)]
pub struct SubscriptionHandle {
    state: Arc<SubscriptionState>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.state.id
    }

    pub fn buffered(&self) -> usize {
        self.state.buffered()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    pub fn cancel(&self) {
        self.state.cancel();
    }
}

/// Local in-memory implementation of EventBus
///
/// Every subscription owns a bounded tokio channel: `broadcast` for
/// drop-oldest, `mpsc` for drop-latest. Fan-out happens inline in
/// `publish` under a read lock and never waits on a consumer.
#[derive(Clone)]
pub struct LocalEventBus {
    registry: Arc<Registry>,
    capacity: usize,
    policy: OverflowPolicy,
}

impl LocalEventBus {
    /// Create a new event bus with the given per-subscription capacity
    ///
    /// The capacity is rounded up to a power of two, as `broadcast` does.
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        tracing::info!(
            "Event bus initialized with per-subscriber capacity {} ({})",
            capacity,
            policy
        );
        Self {
            registry: Arc::new(Registry {
                subscribers: RwLock::new(HashMap::new()),
                published: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
            }),
            capacity,
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Events currently buffered for a subscription, if it is still registered
    pub fn buffered_for(&self, id: SubscriptionId) -> Option<usize> {
        self.registry.buffered(id)
    }
}

impl EventBus for LocalEventBus {
    fn publish(&self, event: DomainEvent) {
        self.registry.published.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("gymflow_events_published_total").increment(1);

        let mut delivered = 0usize;
        let mut dropped = 0u64;
        {
            let subscribers = self.registry.subscribers.read();
            for (id, slot) in subscribers.iter() {
                match slot.sender.deliver(event.clone(), self.capacity) {
                    Delivery::Queued => delivered += 1,
                    Delivery::Overflowed => {
                        delivered += 1;
                        dropped += 1;
                        slot.dropped.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!("Subscriber {} buffer full, applied {}", id, self.policy);
                    }
                    Delivery::Closed => {}
                }
            }
        }

        if dropped > 0 {
            self.registry.dropped.fetch_add(dropped, Ordering::Relaxed);
            metrics::counter!("gymflow_events_dropped_total").increment(dropped);
        }

        if delivered == 0 {
            tracing::debug!(
                "No active subscribers for {} on class {}",
                event.kind,
                event.class_id
            );
        } else {
            tracing::debug!(
                "Published {} on class {} to {} subscribers",
                event.kind,
                event.class_id,
                delivered
            );
        }
    }

    fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (sender, receiver) = channel(self.capacity, self.policy);
        let dropped = Arc::new(AtomicU64::new(0));

        let total = {
            let mut subscribers = self.registry.subscribers.write();
            subscribers.insert(
                id,
                SubscriberSlot {
                    sender,
                    dropped: dropped.clone(),
                },
            );
            let total = subscribers.len();
            metrics::gauge!("gymflow_event_subscriptions_active").set(total as f64);
            total
        };
        tracing::info!("New subscriber {} connected ({} active)", id, total);

        Subscription {
            receiver,
            state: Arc::new(SubscriptionState {
                id,
                registry: Arc::downgrade(&self.registry),
                dropped,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    fn subscriber_count(&self) -> usize {
        self.registry.subscribers.read().len()
    }

    fn stats(&self) -> BusStats {
        BusStats {
            subscribers: self.subscriber_count(),
            published: self.registry.published.load(Ordering::Relaxed),
            dropped: self.registry.dropped.load(Ordering::Relaxed),
        }
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new(256, OverflowPolicy::DropOldest)
    }
}
