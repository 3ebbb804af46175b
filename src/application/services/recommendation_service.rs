use crate::domain::entities::Recommendation;
use crate::domain::events::{DomainEvent, EventKind};
use crate::domain::ports::class_repository::ClassRepository;
use crate::domain::services::recommendation_rules::{
    friendly_class_name, numeric_class_id, rule_for,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Builds per-subscription recommendation pipelines
///
/// The service itself is stateless and cheap to clone; each call to
/// [`RecommendationService::pipeline`] gets a fresh dedup set.
#[derive(Clone)]
pub struct RecommendationService {
    class_repo: Arc<dyn ClassRepository>,
    relevant_kinds: Arc<[EventKind]>,
}

impl RecommendationService {
    pub fn new(class_repo: Arc<dyn ClassRepository>) -> Self {
        Self {
            class_repo,
            relevant_kinds: Arc::from(EventKind::ALL.as_slice()),
        }
    }

    /// Restrict which event kinds produce recommendations
    pub fn with_relevant_kinds(mut self, kinds: &[EventKind]) -> Self {
        self.relevant_kinds = Arc::from(kinds);
        self
    }

    pub fn is_relevant(&self, kind: EventKind) -> bool {
        self.relevant_kinds.contains(&kind)
    }

    pub fn pipeline(&self) -> RecommendationPipeline {
        RecommendationPipeline {
            service: self.clone(),
            seen: HashSet::new(),
        }
    }

    /// Resolve a class id to a display name
    ///
    /// Numeric ids go through the class catalog on the blocking pool;
    /// `None` means the event should be dropped (unknown class or lookup failure).
    /// Anything else is named from its code prefix without a lookup.
    pub async fn resolve_class_name(&self, class_id: &str) -> Option<String> {
        let Some(id) = numeric_class_id(class_id) else {
            tracing::debug!(
                "Non-numeric class id {}, deriving a generic name",
                class_id
            );
            return Some(friendly_class_name(class_id));
        };

        let class_repo = self.class_repo.clone();
        let lookup = tokio::task::spawn_blocking(move || class_repo.find_by_id(id)).await;

        match lookup {
            Ok(Ok(Some(class))) => Some(class.name),
            Ok(Ok(None)) => {
                tracing::info!("Class {} not found in catalog, skipping event", id);
                None
            }
            Ok(Err(e)) => {
                metrics::counter!("gymflow_class_lookup_failures_total").increment(1);
                tracing::warn!("Error looking up class {}: {}", id, e);
                None
            }
            Err(e) => {
                metrics::counter!("gymflow_class_lookup_failures_total").increment(1);
                tracing::error!("Class lookup task for {} failed: {}", id, e);
                None
            }
        }
    }
}

/// Filter, enrich, derive and dedup for one subscription's event stream
pub struct RecommendationPipeline {
    service: RecommendationService,
    seen: HashSet<String>,
}

impl RecommendationPipeline {
    /// Run one event through every stage; `None` when it is filtered out
    pub async fn process(&mut self, event: &DomainEvent) -> Option<Recommendation> {
        if !self.service.is_relevant(event.kind) {
            tracing::debug!("Ignoring irrelevant event kind {}", event.kind);
            return None;
        }

        let class_name = self.service.resolve_class_name(&event.class_id).await?;

        let rule = rule_for(event.kind);
        let recommendation = Recommendation {
            class_id: event.class_id.clone(),
            message: rule.render(&class_name),
            class_name: Some(class_name),
            priority: rule.priority,
            timestamp: event.occurred_at,
        };

        // First recommendation per class wins for the lifetime of the pipeline
        if !self.seen.insert(recommendation.class_id.clone()) {
            tracing::debug!(
                "Suppressing duplicate recommendation for class {}",
                recommendation.class_id
            );
            return None;
        }

        metrics::counter!("gymflow_recommendations_emitted_total").increment(1);
        Some(recommendation)
    }

    /// Number of distinct classes already recommended
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
