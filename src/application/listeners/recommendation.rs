use crate::application::services::RecommendationPipeline;
use crate::domain::entities::Recommendation;
use crate::shared::events::Subscription;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Drive one subscription's events through its pipeline into the session output
///
/// Returns when the session is cancelled or its subscription closes, and also
/// once the client side of `output` is gone.
/// Lookup failures and unknown classes are handled inside the pipeline and
/// never end the loop.
pub async fn run_recommendation_listener(
    mut subscription: Subscription,
    mut pipeline: RecommendationPipeline,
    output: broadcast::Sender<Recommendation>,
    shutdown: CancellationToken,
) {
    let subscription_id = subscription.id();
    tracing::debug!("Recommendation listener started for {}", subscription_id);

    loop {
        let event = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            next = subscription.recv() => match next {
                Some(event) => event,
                None => break,
            },
        };

        tracing::debug!(
            "Listener {} received {} for class {}",
            subscription_id,
            event.kind,
            event.class_id
        );

        let recommendation = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            recommendation = pipeline.process(&event) => recommendation,
        };

        if let Some(recommendation) = recommendation {
            tracing::info!(
                "Recommendation emitted for class {} (priority {})",
                recommendation.class_id,
                recommendation.priority
            );
            if output.send(recommendation).is_err() {
                tracing::debug!("Client for {} is gone", subscription_id);
                break;
            }
        }
    }

    subscription.cancel();
    tracing::debug!("Recommendation listener stopped for {}", subscription_id);
}
