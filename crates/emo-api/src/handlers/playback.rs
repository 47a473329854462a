//! Playback control handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use emo_models::PlaybackView;

use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Result of a playback control.
#[derive(Debug, Serialize)]
pub struct PlaybackControlResponse {
    /// False when the control was a no-op (nothing to play or skip)
    pub applied: bool,
    pub playback: PlaybackView,
}

pub async fn get_playback(State(state): State<AppState>) -> Json<PlaybackView> {
    Json(state.store.playback())
}

pub async fn toggle_playback(State(state): State<AppState>) -> Json<PlaybackControlResponse> {
    let applied = state.store.toggle_play();
    Json(PlaybackControlResponse {
        applied,
        playback: state.store.playback(),
    })
}

pub async fn skip_item(State(state): State<AppState>) -> Json<PlaybackControlResponse> {
    let applied = state.store.skip().is_some();
    Json(PlaybackControlResponse {
        applied,
        playback: state.store.playback(),
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct VolumeRequest {
    #[validate(range(max = 100, message = "volume must be between 0 and 100"))]
    pub volume: u32,
}

pub async fn set_volume(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VolumeRequest>,
) -> ApiResult<Json<PlaybackView>> {
    state.store.set_volume(request.volume)?;
    Ok(Json(state.store.playback()))
}

pub async fn toggle_mute(State(state): State<AppState>) -> Json<PlaybackView> {
    state.store.toggle_mute();
    Json(state.store.playback())
}
