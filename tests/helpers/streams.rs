use futures::{Stream, StreamExt};
use gymflow::domain::entities::Recommendation;
use gymflow::shared::events::Subscription;
use gymflow::DomainEvent;
use std::time::Duration;

pub const STEP_TIMEOUT: Duration = Duration::from_secs(2);

/// Next item or panic after a generous timeout
pub async fn next_within<S>(stream: &mut S) -> S::Item
where
    S: Stream + Unpin,
{
    tokio::time::timeout(STEP_TIMEOUT, stream.next())
        .await
        .expect("timed out waiting for the next stream item")
        .expect("stream ended unexpectedly")
}

/// Next non-heartbeat recommendation
pub async fn next_recommendation<S>(stream: &mut S) -> Recommendation
where
    S: Stream<Item = Recommendation> + Unpin,
{
    loop {
        let item = next_within(stream).await;
        if !item.is_heartbeat() {
            return item;
        }
    }
}

pub async fn recv_within(subscription: &mut Subscription) -> DomainEvent {
    tokio::time::timeout(STEP_TIMEOUT, subscription.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("subscription closed unexpectedly")
}

/// Drain whatever is already buffered without waiting
pub fn drain(subscription: &mut Subscription) -> Vec<DomainEvent> {
    std::iter::from_fn(|| subscription.try_recv()).collect()
}
