#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use axum_extra::extract::cookie::Key;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tower::ServiceExt;

use spotshare::{
    config::{DEFAULT_SCOPE, Settings, SpotifySettings},
    error::ApiError,
    feed::MemoryFeedStore,
    server,
    session::MemorySessionStore,
    spotify::{ApiRequest, ApiResponse, SpotifyApi},
    state::AppState,
    types::TokenGrant,
    utils,
};

pub enum RefreshOutcome {
    Grant {
        access_token: String,
        refresh_token: Option<String>,
    },
    Rejected,
}

/// Scripted Spotify: every GET pops the next response queued for its path,
/// every refresh pops the next outcome. Calls are recorded for assertions.
#[derive(Default)]
pub struct FakeSpotify {
    responses: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    refreshes: Mutex<VecDeque<RefreshOutcome>>,
    exchange: Mutex<Option<TokenGrant>>,
    gets: Mutex<Vec<(String, String)>>,
    refresh_calls: Mutex<Vec<String>>,
}

impl FakeSpotify {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_get(&self, path: &str, status: u16, body: Value) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(ApiResponse::new(StatusCode::from_u16(status).unwrap(), body));
    }

    pub fn on_refresh(&self, access_token: &str, refresh_token: Option<&str>) {
        self.refreshes
            .lock()
            .unwrap()
            .push_back(RefreshOutcome::Grant {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.map(str::to_string),
            });
    }

    pub fn reject_refresh(&self) {
        self.refreshes
            .lock()
            .unwrap()
            .push_back(RefreshOutcome::Rejected);
    }

    pub fn on_exchange(&self, access_token: &str, refresh_token: &str) {
        *self.exchange.lock().unwrap() = Some(grant(access_token, Some(refresh_token)));
    }

    /// `(path, bearer token)` of every GET, in order.
    pub fn gets(&self) -> Vec<(String, String)> {
        self.gets.lock().unwrap().clone()
    }

    pub fn get_count(&self) -> usize {
        self.gets.lock().unwrap().len()
    }

    /// Refresh tokens presented to the token endpoint, in order.
    pub fn refresh_calls(&self) -> Vec<String> {
        self.refresh_calls.lock().unwrap().clone()
    }
}

pub fn grant(access_token: &str, refresh_token: Option<&str>) -> TokenGrant {
    serde_json::from_value(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 3600,
        "scope": "user-top-read"
    }))
    .unwrap()
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn get(
        &self,
        request: &ApiRequest,
        access_token: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.gets
            .lock()
            .unwrap()
            .push((request.path.clone(), access_token.to_string()));

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(|queue| queue.pop_front());

        Ok(next.unwrap_or_else(|| {
            ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "unscripted request")
        }))
    }

    async fn exchange_code(
        &self,
        _code: &str,
        _code_verifier: &str,
    ) -> Result<TokenGrant, ApiError> {
        self.exchange
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::UpstreamUnavailable("exchange not scripted".into()))
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, ApiError> {
        self.refresh_calls
            .lock()
            .unwrap()
            .push(refresh_token.to_string());

        let outcome = self.refreshes.lock().unwrap().pop_front();
        // Give concurrent callers a chance to pile up behind the refresh lock.
        tokio::time::sleep(Duration::from_millis(20)).await;

        match outcome {
            Some(RefreshOutcome::Grant {
                access_token,
                refresh_token,
            }) => Ok(grant(&access_token, refresh_token.as_deref())),
            Some(RefreshOutcome::Rejected) => {
                Err(ApiError::RefreshFailed("400: invalid_grant".into()))
            }
            None => Err(ApiError::UpstreamUnavailable("refresh not scripted".into())),
        }
    }
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("spotshare-test-{}", utils::generate_state()))
        .join(name)
}

pub fn settings() -> Settings {
    Settings {
        server_addr: "127.0.0.1:0".parse().unwrap(),
        spotify: SpotifySettings {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            redirect_uri: "http://127.0.0.1:8888/callback".parse().unwrap(),
            scope: DEFAULT_SCOPE.into(),
            auth_url: "https://accounts.spotify.test/authorize".parse().unwrap(),
            token_url: "https://accounts.spotify.test/api/token".parse().unwrap(),
            api_url: "https://api.spotify.test/v1".parse().unwrap(),
            timeout: Duration::from_secs(5),
        },
        cookie_key: Key::generate(),
        secure_cookies: false,
        session_ttl: Duration::from_secs(3600),
        public_dir: PathBuf::from("public"),
        feed_path: temp_path("shared_tracks.json"),
    }
}

pub struct TestApp {
    pub router: Router,
    pub spotify: Arc<FakeSpotify>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let spotify = FakeSpotify::new();
        let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(3600)));
        let state = AppState::new(
            settings(),
            spotify.clone(),
            sessions.clone(),
            Arc::new(MemoryFeedStore::new()),
        );

        Self {
            router: server::router(state),
            spotify,
            sessions,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Runs the login + callback round trip and returns the callback
    /// response. The exchange hands out `A1` / `R1`.
    pub async fn sign_in_response(&self) -> Response<Body> {
        self.spotify.on_exchange("A1", "R1");

        let login = self.get("/auth/spotify", None).await;
        let target = location(&login);
        let state = url::Url::parse(&target)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();

        let oauth_cookies = cookie_header(&login);
        self.get(
            &format!("/callback?code=test-code&state={state}"),
            Some(&oauth_cookies),
        )
        .await
    }

    /// Signs in and returns the `Cookie` header value of the new session.
    pub async fn sign_in(&self) -> String {
        let callback = self.sign_in_response().await;
        assert_eq!(location(&callback), "/dashboard");

        set_cookies(&callback)
            .into_iter()
            .find(|c| c.starts_with("spotshare_session=") && c != "spotshare_session=")
            .expect("session cookie")
    }
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` pairs of all `Set-Cookie` headers.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
        .collect()
}

pub fn cookie_header(response: &Response<Body>) -> String {
    set_cookies(response).join("; ")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
