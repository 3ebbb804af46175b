use crate::{
    domain::events::{DomainEvent, EventKind},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
    shared::events::BusStats,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmittedEventResponse {
    pub message: String,
    pub class_id: String,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl EmittedEventResponse {
    pub fn new(message: &str, event: &DomainEvent) -> Self {
        Self {
            message: message.to_string(),
            class_id: event.class_id.clone(),
            kind: event.kind,
            timestamp: event.occurred_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub message: String,
    pub events: Vec<String>,
}

/// POST /api/test/events/:class_id/:kind - Emit one synthetic event
pub async fn emit_event(
    State(state): State<AppState>,
    Path((class_id, kind)): Path<(String, String)>,
) -> ApiResult<Json<EmittedEventResponse>> {
    let kind: EventKind = kind.parse()?;
    if class_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Class id must not be empty".to_string()));
    }

    let event = state.event_service.emit(class_id, kind);
    Ok(Json(EmittedEventResponse::new("Event emitted", &event)))
}

/// POST /api/test/events/batch - Emit the fixed verification batch
pub async fn emit_sample_batch(State(state): State<AppState>) -> Json<BatchResponse> {
    let events = state.event_service.emit_sample_batch();

    Json(BatchResponse {
        message: format!("{} test events emitted", events.len()),
        events: events
            .iter()
            .map(|e| format!("{}:{}", e.class_id, e.kind))
            .collect(),
    })
}

/// GET /api/events/stats - Bus counters
pub async fn get_event_stats(State(state): State<AppState>) -> Json<BusStats> {
    Json(state.event_bus.stats())
}
