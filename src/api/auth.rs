use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::{
    session::{TokenHolder, cookies},
    spotify::auth::authorization_request,
    state::AppState,
    utils,
};

const HOME_PATH: &str = "/";
const DASHBOARD_PATH: &str = "/dashboard";

/// `GET /auth/spotify`: send the browser to Spotify's consent page.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let request = authorization_request(&state.settings.spotify);

    let (state_cookie, pkce_cookie) = cookies::oauth_cookies(
        &request.state,
        &request.code_verifier,
        state.settings.secure_cookies,
    );

    (
        jar.add(state_cookie).add(pkce_cookie),
        Redirect::to(request.url.as_str()),
    )
}

#[derive(Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// `GET /callback`: redeem the authorization code and open a session.
///
/// Any failure sends the browser back to the login page.
pub async fn callback(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> (PrivateCookieJar, Redirect) {
    let (clear_state, clear_pkce) = cookies::clear_oauth_cookies();
    let stored_state = cookies::oauth_state(&jar);
    let code_verifier = cookies::pkce_verifier(&jar);
    let previous_session = cookies::session_id(&jar);
    let jar = jar.remove(clear_state).remove(clear_pkce);

    if let Some(error) = &params.error {
        tracing::warn!(error = %error, "Spotify denied authorization");
        return (jar, Redirect::to(HOME_PATH));
    }

    let (Some(code), Some(received_state)) = (params.code, params.state) else {
        tracing::warn!("Callback without code or state");
        return (jar, Redirect::to(HOME_PATH));
    };

    if stored_state.as_deref() != Some(received_state.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return (jar, Redirect::to(HOME_PATH));
    }

    let Some(code_verifier) = code_verifier else {
        tracing::warn!("Callback without PKCE verifier");
        return (jar, Redirect::to(HOME_PATH));
    };

    let tokens = match state
        .spotify
        .exchange_code(&code, &code_verifier)
        .await
        .and_then(TokenHolder::from_grant)
    {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            return (jar, Redirect::to(HOME_PATH));
        }
    };

    if let Some(previous) = previous_session {
        state.sessions.remove(&previous).await;
    }

    let session_id = utils::generate_session_id();
    state.sessions.put(&session_id, Arc::new(tokens)).await;

    let session_cookie = cookies::session_cookie(&session_id, state.settings.secure_cookies);

    tracing::info!("Spotify login successful");
    (jar.add(session_cookie), Redirect::to(DASHBOARD_PATH))
}

/// `GET /logout`
pub async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    if let Some(session_id) = cookies::session_id(&jar) {
        state.sessions.remove(&session_id).await;
        tracing::info!("Session closed");
    }

    (jar.remove(cookies::clear_session_cookie()), Redirect::to(HOME_PATH))
}

/// `GET /dashboard`: the signed-in page, or back to login.
pub async fn dashboard(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    let signed_in = match cookies::session_id(&jar) {
        Some(session_id) => state.sessions.get(&session_id).await.is_some(),
        None => false,
    };
    if !signed_in {
        return Redirect::to(HOME_PATH).into_response();
    }

    let path = state.settings.public_dir.join("dashboard.html");
    match async_fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Dashboard page unavailable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
