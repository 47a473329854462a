//! Detection and session handlers.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use emo_models::{
    DetectionSessionView, EmotionSample, FrameData, Recommendation, StateSnapshot,
};
use emo_session::{SessionSummary, SnapshotOutcome};

use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Full observable engine state.
pub async fn get_state(State(state): State<AppState>) -> Json<StateSnapshot> {
    Json(state.store.snapshot())
}

#[derive(Debug, Deserialize, Validate)]
pub struct SnapshotRequest {
    /// `data:image/...;base64,` URL of the captured frame
    #[validate(length(min = 1, message = "image is required"))]
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    /// `processed`, `skipped_session_active` or `skipped_analyzing`
    pub outcome: &'static str,
    pub state: StateSnapshot,
}

fn outcome_label(outcome: &SnapshotOutcome) -> &'static str {
    match outcome {
        SnapshotOutcome::Processed(_) => "processed",
        SnapshotOutcome::SkippedSessionActive => "skipped_session_active",
        SnapshotOutcome::SkippedAnalyzing => "skipped_analyzing",
        SnapshotOutcome::NoFrame => "no_frame",
    }
}

/// Submit a captured frame for analysis.
///
/// Ignored while a detection cooldown or another analysis is running; the
/// response always carries the resulting state.
pub async fn process_snapshot(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SnapshotRequest>,
) -> ApiResult<Json<SnapshotResponse>> {
    let frame = FrameData::from_data_url(request.image)?;

    let outcome = state.store.process_snapshot(frame).await?;

    Ok(Json(SnapshotResponse {
        outcome: outcome_label(&outcome),
        state: state.store.snapshot(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    /// Whether a running cooldown was cleared
    pub cleared: bool,
    pub detection_session: DetectionSessionView,
}

/// Manually clear the detection session.
pub async fn reset_session(State(state): State<AppState>) -> Json<ResetResponse> {
    let cleared = state.store.reset_session();
    if cleared {
        info!("Detection session reset via API");
    }

    Json(ResetResponse {
        cleared,
        detection_session: state.store.snapshot().detection_session,
    })
}

/// Retained history, oldest first.
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<EmotionSample>> {
    Json(state.store.history())
}

/// Current music and study recommendations.
pub async fn get_recommendations(State(state): State<AppState>) -> Json<Vec<Recommendation>> {
    Json(state.store.recommendations())
}

/// Session summary. 404 until something has been detected.
pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<SessionSummary>> {
    state
        .store
        .summary()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No emotions detected yet"))
}

/// Summary as a downloadable `emotion-session-YYYY-MM-DD.json` attachment.
pub async fn export_summary(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let summary = state
        .store
        .summary()
        .ok_or_else(|| ApiError::not_found("No emotions detected yet"))?;

    let body = summary.to_json()?;
    let disposition = format!("attachment; filename=\"{}\"", summary.file_name());
    info!(
        detections = summary.total_detections,
        file = %summary.file_name(),
        "Session summary exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub text: String,
}

/// One-line share text for the current session.
pub async fn share_summary(State(state): State<AppState>) -> ApiResult<Json<ShareResponse>> {
    state
        .store
        .summary()
        .map(|summary| {
            Json(ShareResponse {
                text: summary.share_text(),
            })
        })
        .ok_or_else(|| ApiError::not_found("No emotions detected yet"))
}
