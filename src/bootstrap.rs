use crate::application::services::{
    EventService, RecommendationService, RecommendationStreamService, StreamConfig,
};
use crate::config::Config;
use crate::domain::ports::class_repository::ClassRepository;
use crate::domain::ports::event_bus::EventBus;
use crate::domain::ports::task_spawner::TaskSpawner;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::{InMemoryClassRepository, JsonFileClassRepository};
use crate::infrastructure::runtime::TokioTaskSpawner;
use crate::shared::events::LocalEventBus;
use std::sync::Arc;

/// Pick the class catalog adapter from configuration
pub fn build_class_repository(config: &Config) -> Arc<dyn ClassRepository> {
    match &config.class_catalog_path {
        Some(path) => {
            tracing::info!("Class catalog backed by {}", path);
            Arc::new(JsonFileClassRepository::new(path))
        }
        None => {
            tracing::warn!(
                "CLASS_CATALOG_PATH not set; numeric class ids will not resolve"
            );
            Arc::new(InMemoryClassRepository::new())
        }
    }
}

pub fn build_app_state(config: &Config, class_repo: Arc<dyn ClassRepository>) -> AppState {
    // The bus lives as long as the server; producers and sessions share it
    let event_bus: Arc<dyn EventBus> = Arc::new(LocalEventBus::new(
        config.event_bus_capacity,
        config.overflow_policy,
    ));

    let task_spawner = Arc::new(TokioTaskSpawner::new()) as Arc<dyn TaskSpawner>;

    let event_service = EventService::new(event_bus.clone());
    tracing::info!("Event service initialized");

    let recommendation_service = RecommendationService::new(class_repo);

    let stream_service = RecommendationStreamService::new(
        event_bus.clone(),
        recommendation_service,
        task_spawner,
        StreamConfig {
            heartbeat_interval: config.heartbeat_interval,
            output_capacity: config.recommendation_buffer,
        },
    );
    tracing::info!(
        "Recommendation streaming initialized (heartbeat every {:?})",
        config.heartbeat_interval
    );

    AppState {
        event_bus,
        event_service,
        stream_service,
    }
}
