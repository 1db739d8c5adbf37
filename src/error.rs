use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Where the front-end should send a user whose session cannot be recovered.
pub const LOGIN_PATH: &str = "/auth/spotify";

/// Terminal failures of an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No session, or a session without tokens.
    #[error("Unauthorized")]
    Unauthorized,

    /// The artist search yielded nothing.
    #[error("Not found")]
    NotFound,

    /// Spotify failed in a way the single refresh-and-replay did not fix.
    /// Carries the diagnostic detail that is logged, never returned.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The refresh token was rejected; the session has to be rebuilt.
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    #[error("{0}")]
    BadRequest(String),

    /// Shared-track document store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::RefreshFailed(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamUnavailable(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Unauthorized => json!({ "error": "Unauthorized" }),
            Self::NotFound => json!({ "error": "Not found" }),
            Self::BadRequest(msg) => json!({ "error": msg }),
            Self::RefreshFailed(detail) => {
                tracing::warn!(detail = %detail, "Refresh token rejected, session closed");
                json!({ "error": "Session expired", "login": LOGIN_PATH })
            }
            Self::UpstreamUnavailable(detail) => {
                tracing::error!(detail = %detail, "Spotify request failed");
                json!({ "error": "Error fetching data from Spotify" })
            }
            Self::Store(detail) => {
                tracing::error!(detail = %detail, "Document store error");
                json!({ "error": "Database error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
