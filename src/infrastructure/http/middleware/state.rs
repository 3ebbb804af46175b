use crate::application::services::{EventService, RecommendationStreamService};
use crate::domain::ports::event_bus::EventBus;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub event_bus: Arc<dyn EventBus>,
    pub event_service: EventService,
    pub stream_service: RecommendationStreamService,
}
