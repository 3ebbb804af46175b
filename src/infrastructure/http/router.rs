use crate::infrastructure::http::controllers::{events, recommendations};
use crate::infrastructure::http::middleware::{ApiError, AppState};
use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    // Recommendation streaming and the producer-facing simulate endpoint
    let recommendation_routes = Router::new()
        .route(
            "/api/recommendations/stream",
            get(recommendations::stream_recommendations),
        )
        .route(
            "/api/recommendations/simulate",
            post(recommendations::simulate_event),
        );

    // Verification and ops surface; goes through the same bus as producers
    let ops_routes = Router::new()
        .route("/api/test/events/batch", post(events::emit_sample_batch))
        .route("/api/test/events/:class_id/:kind", post(events::emit_event))
        .route("/api/events/stats", get(events::get_event_stats));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(recommendation_routes)
        .merge(ops_routes)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Gymflow Class Recommendations"
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
