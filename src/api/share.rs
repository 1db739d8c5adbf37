use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    error::ApiError,
    state::AppState,
    types::{ShareRequest, SharedTrack},
};

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `POST /api/share`: append a track to the feed.
pub async fn share(
    State(state): State<AppState>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected share body");
        ApiError::BadRequest("Invalid JSON body".into())
    })?;

    let (Some(track), Some(artist)) = (non_empty(request.track), non_empty(request.artist)) else {
        return Err(ApiError::BadRequest("Missing track or artist".into()));
    };

    let shared = SharedTrack {
        track,
        artist,
        album: non_empty(request.album),
        image_url: non_empty(request.image_url),
        shared_at: Utc::now(),
    };

    state
        .feed
        .insert(shared)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    tracing::info!("Track shared");
    Ok(Json(json!({ "message": "Track shared!" })))
}

/// `GET /api/shared-tracks`: the feed, newest first.
pub async fn shared_tracks(
    State(state): State<AppState>,
) -> Result<Json<Vec<SharedTrack>>, ApiError> {
    state
        .feed
        .list_newest_first()
        .await
        .map(Json)
        .map_err(|e| ApiError::Store(e.to_string()))
}
