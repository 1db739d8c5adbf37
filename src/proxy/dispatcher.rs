use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;

use super::descriptor::{self, Descriptor};
use crate::{
    error::ApiError,
    session::TokenHolder,
    spotify::{ApiRequest, ApiResponse, SpotifyApi},
    types::RelatedArtist,
};

/// Runs proxied reads against Spotify on behalf of a session.
///
/// Every call goes through [`Dispatcher::authorized_get`]: a `401` from
/// Spotify triggers one refresh of the session's access token and one replay
/// of the same request. Whatever the replay returns is final.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn SpotifyApi>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn SpotifyApi>) -> Self {
        Self { api }
    }

    /// Performs `request` with the session's token, refreshing and replaying
    /// once on `401 Unauthorized`.
    ///
    /// Returns the decoded JSON body, or `None` for `204 No Content`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RefreshFailed`] if the refresh token is rejected
    /// - [`ApiError::UpstreamUnavailable`] for a second `401`, any other
    ///   non-success status, a transport failure or an unparsable body
    pub async fn authorized_get(
        &self,
        tokens: &TokenHolder,
        request: &ApiRequest,
    ) -> Result<Option<Value>, ApiError> {
        let access_token = tokens.current_access_token().await;
        let mut response = self.api.get(request, &access_token).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            tracing::debug!(path = %request.path, "Access token rejected, refreshing");
            let fresh_token = tokens.refresh(self.api.as_ref(), &access_token).await?;

            response = self.api.get(request, &fresh_token).await?;
            if response.status == StatusCode::UNAUTHORIZED {
                return Err(ApiError::UpstreamUnavailable(format!(
                    "GET {} still unauthorized after refresh: {}",
                    request.path, response.body
                )));
            }
        }

        payload(request, response)
    }

    /// Runs one descriptor and reshapes the payload.
    pub async fn execute<T>(
        &self,
        tokens: &TokenHolder,
        descriptor: &Descriptor<T>,
    ) -> Result<T, ApiError> {
        let payload = self.authorized_get(tokens, &descriptor.request).await?;
        (descriptor.mapper)(payload)
    }

    /// Resolves `name` to the first matching artist and fetches the artists
    /// Spotify considers related. Each step has its own refresh-and-replay.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the search has no match; the related
    /// endpoint is not called then.
    pub async fn related_artists(
        &self,
        tokens: &TokenHolder,
        name: &str,
    ) -> Result<Vec<RelatedArtist>, ApiError> {
        let artist = self
            .execute(tokens, &descriptor::artist_search(name))
            .await?
            .ok_or(ApiError::NotFound)?;

        tracing::debug!(artist_id = %artist.id, "Resolved artist for related lookup");
        self.execute(tokens, &descriptor::related_artists(&artist.id))
            .await
    }
}

fn payload(request: &ApiRequest, response: ApiResponse) -> Result<Option<Value>, ApiError> {
    let ApiResponse { status, body } = response;

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    if !status.is_success() {
        return Err(ApiError::UpstreamUnavailable(format!(
            "GET {} returned {status}: {body}",
            request.path
        )));
    }

    if body.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&body).map(Some).map_err(|e| {
        ApiError::UpstreamUnavailable(format!("GET {} returned invalid JSON: {e}", request.path))
    })
}
