//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    export_summary, get_history, get_playback, get_recommendations, get_state, get_summary, health,
    process_snapshot, reset_session, set_volume, share_summary, skip_item, toggle_mute,
    toggle_playback,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let session_routes = Router::new()
        .route("/state", get(get_state))
        .route("/snapshot", post(process_snapshot))
        .route("/session/reset", post(reset_session))
        .route("/history", get(get_history))
        .route("/recommendations", get(get_recommendations))
        .route("/summary", get(get_summary))
        .route("/summary/export", get(export_summary))
        .route("/summary/share", get(share_summary));

    let playback_routes = Router::new()
        .route("/playback", get(get_playback))
        .route("/playback/toggle", post(toggle_playback))
        .route("/playback/skip", post(skip_item))
        .route("/playback/volume", post(set_volume))
        .route("/playback/mute", post(toggle_mute));

    let health_routes = Router::new().route("/health", get(health));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", session_routes.merge(playback_routes))
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
