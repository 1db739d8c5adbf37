//! # Spotify Integration Module
//!
//! This module is the boundary between spotshare and the Spotify accounts service
//! and Web API. Everything above it talks to Spotify through the [`SpotifyApi`]
//! trait, which keeps the token lifecycle and the proxy dispatcher testable
//! without a network.
//!
//! ## Layout
//!
//! ```text
//! Proxy Dispatcher / OAuth handlers
//!          ↓
//!     SpotifyApi (trait)
//!          ↓
//!   SpotifyClient (reqwest)
//!          ↓
//!   accounts.spotify.com / api.spotify.com
//! ```
//!
//! - [`auth`] - authorization URL construction for the authorization-code flow
//! - [`client`] - the reqwest implementation of [`SpotifyApi`]
//!
//! ## Response Handling
//!
//! Resource calls resolve to an [`ApiResponse`] for every HTTP status. The
//! client never turns a non-2xx status into an error, so a `401 Unauthorized`
//! is an observed status that the dispatcher reacts to. Only transport level
//! failures (DNS, TLS, timeouts) come back as errors.
//!
//! Token endpoint calls are different: a rejected grant is a terminal
//! [`ApiError::RefreshFailed`], anything else that goes wrong is
//! [`ApiError::UpstreamUnavailable`].

pub mod auth;
pub mod client;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{error::ApiError, types::TokenGrant};

pub use client::SpotifyClient;

/// A bearer-authenticated GET against the Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path below the API base URL, e.g. `/me/top/tracks`.
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }
}

/// Status and raw body of a Web API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The OAuth provider and resource API as seen by the rest of the crate.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Performs one GET. Every HTTP status resolves to `Ok`.
    async fn get(&self, request: &ApiRequest, access_token: &str)
    -> Result<ApiResponse, ApiError>;

    /// Exchanges an authorization code (plus PKCE verifier) for tokens.
    async fn exchange_code(&self, code: &str, code_verifier: &str)
    -> Result<TokenGrant, ApiError>;

    /// Mints a new access token with `grant_type=refresh_token`.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, ApiError>;
}
