use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{Res, api, state::AppState, success};

/// Builds the complete router. Anything not matched falls through to the
/// static front-end in the public directory.
pub fn router(state: AppState) -> Router {
    let public_dir = state.settings.public_dir.clone();

    Router::new()
        .route("/health", get(api::health))
        .route("/auth/spotify", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", get(api::logout))
        .route("/dashboard", get(api::dashboard))
        .route("/api/tracks", get(api::tracks))
        .route("/api/top-tracks", get(api::top_tracks))
        .route("/api/artists", get(api::artists))
        .route("/api/now-playing", get(api::now_playing))
        .route("/api/recently-played", get(api::recently_played))
        .route("/api/related-artists", get(api::related_artists))
        .route("/api/shared-tracks", get(api::shared_tracks))
        .route("/api/share", post(api::share))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_api_server(state: AppState, addr: SocketAddr) -> Res<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    success!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
