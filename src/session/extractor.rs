use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Key;

use super::{TokenHolder, cookies};
use crate::{error::ApiError, state::AppState};

/// A request that belongs to a signed-in session.
///
/// Use as an Axum extractor; rejects with `401 Unauthorized` before the
/// handler runs when the cookie is missing or the session is gone, so no
/// Spotify call is ever attempted for anonymous requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(auth: Authenticated) -> impl IntoResponse {
///     let token = auth.tokens.current_access_token().await;
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct Authenticated {
    pub session_id: String,
    pub tokens: Arc<TokenHolder>,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar<Key> = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        let session_id = cookies::session_id(&jar).ok_or(ApiError::Unauthorized)?;

        let tokens = state
            .sessions
            .get(&session_id)
            .await
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self { session_id, tokens })
    }
}
