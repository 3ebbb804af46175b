use crate::application::listeners::recommendation::run_recommendation_listener;
use crate::application::services::RecommendationService;
use crate::domain::entities::Recommendation;
use crate::domain::ports::event_bus::EventBus;
use crate::domain::ports::task_spawner::TaskSpawner;
use crate::shared::events::{SubscriptionHandle, SubscriptionId};
use futures::stream::{BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, IntervalStream};
use tokio_util::sync::CancellationToken;

/// Shortest heartbeat period accepted; a zero period would stall the ticker
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    pub heartbeat_interval: Duration,
    /// Recommendations kept for a lagging client; older ones are dropped
    pub output_capacity: usize,
}

impl StreamConfig {
    /// Clamp to values the ticker and the output channel accept
    pub fn normalized(self) -> Self {
        Self {
            heartbeat_interval: self.heartbeat_interval.max(MIN_HEARTBEAT_INTERVAL),
            output_capacity: self.output_capacity.max(1),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(15),
            output_capacity: 1,
        }
    }
}

/// Opens one merged recommendation + heartbeat stream per client
#[derive(Clone)]
pub struct RecommendationStreamService {
    event_bus: Arc<dyn EventBus>,
    recommendation_service: RecommendationService,
    task_spawner: Arc<dyn TaskSpawner>,
    config: StreamConfig,
}

impl RecommendationStreamService {
    pub fn new(
        event_bus: Arc<dyn EventBus>,
        recommendation_service: RecommendationService,
        task_spawner: Arc<dyn TaskSpawner>,
        config: StreamConfig,
    ) -> Self {
        Self {
            event_bus,
            recommendation_service,
            task_spawner,
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    /// Start a client session
    ///
    /// The bus subscription is registered before this returns, so every
    /// event published afterwards reaches the session.
    pub fn open(&self) -> RecommendationStream {
        let subscription = self.event_bus.subscribe();
        let handle = subscription.handle();
        let shutdown = CancellationToken::new();
        // A lagging client skips to the newest recommendations
        let (output, receiver) = broadcast::channel(self.config.output_capacity);

        self.task_spawner.spawn(
            "recommendation-listener",
            Box::pin(run_recommendation_listener(
                subscription,
                self.recommendation_service.pipeline(),
                output,
                shutdown.clone(),
            )),
        );

        let subscription_id = handle.id();
        let recommendations = BroadcastStream::new(receiver).filter_map(move |item| {
            futures::future::ready(match item {
                Ok(recommendation) => Some(recommendation),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        "Client for {} is lagging, skipped {} recommendations",
                        subscription_id,
                        skipped
                    );
                    None
                }
            })
        });

        let period = self.config.heartbeat_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let heartbeats = IntervalStream::new(ticker).map(|_| {
            tracing::trace!("Sending heartbeat");
            Recommendation::heartbeat()
        });

        tracing::info!("Client session opened on subscription {}", handle.id());

        RecommendationStream {
            inner: tokio_stream::StreamExt::merge(recommendations, heartbeats).boxed(),
            guard: SessionGuard {
                subscription: handle,
                shutdown,
            },
        }
    }
}

struct SessionGuard {
    subscription: SubscriptionHandle,
    shutdown: CancellationToken,
}

impl SessionGuard {
    fn cancel(&self) {
        if !self.shutdown.is_cancelled() {
            tracing::info!(
                "Client session on subscription {} closed",
                self.subscription.id()
            );
        }
        self.subscription.cancel();
        self.shutdown.cancel();
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Never-ending per-client stream of recommendations and heartbeats
///
/// It ends only when cancelled; dropping it (client disconnect) releases
/// the bus subscription immediately.
pub struct RecommendationStream {
    inner: BoxStream<'static, Recommendation>,
    guard: SessionGuard,
}

impl RecommendationStream {
    pub fn subscription_id(&self) -> SubscriptionId {
        self.guard.subscription.id()
    }

    pub fn subscription(&self) -> &SubscriptionHandle {
        &self.guard.subscription
    }

    pub fn is_cancelled(&self) -> bool {
        self.guard.shutdown.is_cancelled()
    }

    /// Stop delivery and release the subscription. Idempotent.
    pub fn cancel(&self) {
        self.guard.cancel();
    }
}

impl Stream for RecommendationStream {
    type Item = Recommendation;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.guard.shutdown.is_cancelled() {
            return Poll::Ready(None);
        }
        self.inner.poll_next_unpin(cx)
    }
}
