use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    proxy::descriptor,
    session::{Authenticated, cookies},
    state::AppState,
};

/// Turns a dispatcher result into the response. A rejected refresh token
/// ends the session right here so the next request starts from login.
async fn respond<T: Serialize>(
    state: &AppState,
    auth: &Authenticated,
    jar: PrivateCookieJar,
    result: Result<T, ApiError>,
) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err @ ApiError::RefreshFailed(_)) => {
            state.sessions.remove(&auth.session_id).await;
            (jar.remove(cookies::clear_session_cookie()), err).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// `GET /api/tracks`
pub async fn tracks(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: PrivateCookieJar,
) -> Response {
    let result = state
        .dispatcher
        .execute(&auth.tokens, &descriptor::top_tracks())
        .await;
    respond(&state, &auth, jar, result).await
}

/// `GET /api/top-tracks`
pub async fn top_tracks(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: PrivateCookieJar,
) -> Response {
    let result = state
        .dispatcher
        .execute(&auth.tokens, &descriptor::top_tracks_detailed())
        .await;
    respond(&state, &auth, jar, result).await
}

/// `GET /api/artists`
pub async fn artists(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: PrivateCookieJar,
) -> Response {
    let result = state
        .dispatcher
        .execute(&auth.tokens, &descriptor::top_artists())
        .await;
    respond(&state, &auth, jar, result).await
}

/// `GET /api/now-playing`
pub async fn now_playing(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: PrivateCookieJar,
) -> Response {
    let result = state
        .dispatcher
        .execute(&auth.tokens, &descriptor::now_playing())
        .await;
    respond(&state, &auth, jar, result).await
}

/// `GET /api/recently-played`
pub async fn recently_played(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: PrivateCookieJar,
) -> Response {
    let result = state
        .dispatcher
        .execute(&auth.tokens, &descriptor::recently_played())
        .await;
    respond(&state, &auth, jar, result).await
}

#[derive(Deserialize)]
pub struct RelatedParams {
    name: Option<String>,
}

/// `GET /api/related-artists?name=`
pub async fn related_artists(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: PrivateCookieJar,
    Query(params): Query<RelatedParams>,
) -> Response {
    let Some(name) = params.name.filter(|n| !n.trim().is_empty()) else {
        return ApiError::BadRequest("Missing artist name".into()).into_response();
    };

    let result = state
        .dispatcher
        .related_artists(&auth.tokens, name.trim())
        .await;
    respond(&state, &auth, jar, result).await
}
