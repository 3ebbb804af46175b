use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::StreamExt as _;

use crate::{
    domain::{entities::Recommendation, events::EventKind},
    infrastructure::http::controllers::events::EmittedEventResponse,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateEventRequest {
    pub class_id: String,
    pub kind: EventKind,
}

/// GET /api/recommendations/stream - SSE stream of recommendations
///
/// Each recommendation is sent as a bare `data:` frame so browser
/// `EventSource.onmessage` handlers receive it. Heartbeats keep idle
/// connections open; the stream ends only when the client goes away.
pub async fn stream_recommendations(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.stream_service.open();
    tracing::info!(
        "SSE connection established on subscription {}",
        stream.subscription_id()
    );

    Sse::new(stream.map(|recommendation| Ok(to_sse_event(&recommendation))))
}

fn to_sse_event(recommendation: &Recommendation) -> Event {
    Event::default().json_data(recommendation).unwrap_or_else(|e| {
        tracing::error!(
            "Failed to serialize recommendation for class {}: {}",
            recommendation.class_id,
            e
        );
        Event::default().comment("skipped")
    })
}

/// POST /api/recommendations/simulate - Emit an event from a JSON body
pub async fn simulate_event(
    State(state): State<AppState>,
    Json(request): Json<SimulateEventRequest>,
) -> ApiResult<(StatusCode, Json<EmittedEventResponse>)> {
    if request.class_id.trim().is_empty() {
        return Err(ApiError::BadRequest("classId must not be empty".to_string()));
    }

    let event = state.event_service.emit(request.class_id, request.kind);
    Ok((
        StatusCode::ACCEPTED,
        Json(EmittedEventResponse::new("Event emitted", &event)),
    ))
}
