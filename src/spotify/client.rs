use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config::SpotifySettings,
    error::ApiError,
    spotify::{ApiRequest, ApiResponse, SpotifyApi},
    types::TokenGrant,
};

/// reqwest-backed [`SpotifyApi`]. One instance is shared by all requests so
/// connections are pooled.
pub struct SpotifyClient {
    http: Client,
    settings: SpotifySettings,
}

impl SpotifyClient {
    pub fn new(settings: SpotifySettings) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, settings })
    }

    fn resource_url(&self, path: &str) -> String {
        format!(
            "{base}/{path}",
            base = self.settings.api_url.as_str().trim_end_matches('/'),
            path = path.trim_start_matches('/')
        )
    }

    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<TokenGrant, ApiError> {
        let res = self
            .http
            .post(self.settings.token_url.as_str())
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| ApiError::UpstreamUnavailable(format!("token endpoint: {e}")))?;

        let status = res.status();
        if status.is_success() {
            return res
                .json::<TokenGrant>()
                .await
                .map_err(|e| ApiError::UpstreamUnavailable(format!("token response: {e}")));
        }

        let body = res.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            // invalid_grant, revoked or expired refresh token
            Err(ApiError::RefreshFailed(format!("{status}: {body}")))
        } else {
            Err(ApiError::UpstreamUnavailable(format!(
                "token endpoint {status}: {body}"
            )))
        }
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn get(
        &self,
        request: &ApiRequest,
        access_token: &str,
    ) -> Result<ApiResponse, ApiError> {
        let res = self
            .http
            .get(self.resource_url(&request.path))
            .query(&request.query)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                ApiError::UpstreamUnavailable(format!("GET {} {kind}: {e}", request.path))
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ApiError::UpstreamUnavailable(format!("GET {} body: {e}", request.path)))?;

        Ok(ApiResponse { status, body })
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenGrant, ApiError> {
        let redirect_uri = self.settings.redirect_uri.as_str();
        self.token_grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", code_verifier),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        self.token_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
