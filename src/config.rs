//! Configuration management for spotshare.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. All values are read once at startup into a
//! [`Settings`] value that is handed to the server, so nothing downstream touches
//! the process environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use axum_extra::extract::cookie::Key;
use url::Url;

/// Scopes requested when `SPOTIFY_API_AUTH_SCOPE` is not set.
pub const DEFAULT_SCOPE: &str = "user-read-email user-read-private user-read-playback-state \
user-modify-playback-state user-read-currently-playing user-read-recently-played user-top-read \
playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private";

const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Failed to prepare config directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads environment variables from `.env` files.
///
/// Looks in the working directory first and then in the platform-specific local
/// data directory under `spotshare/.env`. Variables already present in the
/// process environment are never overwritten. A missing file is not an error;
/// an unreadable or malformed one is.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotshare/.env`
/// - macOS: `~/Library/Application Support/spotshare/.env`
/// - Windows: `%LOCALAPPDATA%/spotshare/.env`
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    for candidate in [PathBuf::from(".env"), path] {
        if !candidate.is_file() {
            continue;
        }
        dotenv::from_path(&candidate).map_err(|e| ConfigError::Invalid {
            name: "dotenv",
            reason: format!("{}: {e}", candidate.display()),
        })?;
    }

    Ok(())
}

/// Returns the local data directory used for `.env` and the shared-tracks feed.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotshare");
    path
}

/// Spotify application credentials and endpoints.
#[derive(Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Url,
    pub scope: String,
    pub auth_url: Url,
    pub token_url: Url,
    pub api_url: Url,
    pub timeout: Duration,
}

impl std::fmt::Debug for SpotifySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifySettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("scope", &self.scope)
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("api_url", &self.api_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Everything the server needs at startup.
#[derive(Clone)]
pub struct Settings {
    pub server_addr: SocketAddr,
    pub spotify: SpotifySettings,
    pub cookie_key: Key,
    pub secure_cookies: bool,
    pub session_ttl: Duration,
    pub public_dir: PathBuf,
    pub feed_path: PathBuf,
}

impl Settings {
    /// Builds the settings from the process environment.
    ///
    /// # Required env vars
    /// - `SPOTIFY_API_AUTH_CLIENT_ID`
    /// - `SPOTIFY_API_AUTH_CLIENT_SECRET`
    /// - `SPOTIFY_API_REDIRECT_URI`
    ///
    /// # Optional env vars
    /// - `SPOTIFY_API_AUTH_SCOPE`, `SPOTIFY_API_AUTH_URL`, `SPOTIFY_API_TOKEN_URL`,
    ///   `SPOTIFY_API_URL`: override the Spotify defaults
    /// - `SERVER_ADDRESS`: bind address, `127.0.0.1:8888` by default
    /// - `SESSION_TTL_SECS`: idle session lifetime, one hour by default
    /// - `UPSTREAM_TIMEOUT_SECS`: per-request Spotify timeout, five seconds by default
    /// - `COOKIE_KEY`: at least 64 bytes; an ephemeral key is generated otherwise
    /// - `SECURE_COOKIES`: `false` or `0` for plain-http development
    /// - `PUBLIC_DIR`: static front-end, `./public` by default
    /// - `FEED_PATH`: shared-tracks JSON file, inside [`data_dir`] by default
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let spotify = SpotifySettings {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: parse_url("SPOTIFY_API_REDIRECT_URI", &required("SPOTIFY_API_REDIRECT_URI")?)?,
            scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: parse_url(
                "SPOTIFY_API_AUTH_URL",
                &optional("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            )?,
            token_url: parse_url(
                "SPOTIFY_API_TOKEN_URL",
                &optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            )?,
            api_url: parse_url(
                "SPOTIFY_API_URL",
                &optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            )?,
            timeout: Duration::from_secs(parse_number(
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
        };

        let server_addr = optional("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        let cookie_key = match optional("COOKIE_KEY") {
            Some(k) => Key::try_from(k.as_bytes()).map_err(|_| ConfigError::Invalid {
                name: "COOKIE_KEY",
                reason: "must be at least 64 bytes".into(),
            })?,
            None => Key::generate(),
        };

        let secure_cookies = !matches!(
            optional("SECURE_COOKIES").as_deref(),
            Some("0") | Some("false")
        );

        Ok(Self {
            server_addr,
            spotify,
            cookie_key,
            secure_cookies,
            session_ttl: Duration::from_secs(parse_number(
                "SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?),
            public_dir: optional("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            feed_path: optional("FEED_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("shared_tracks.json")),
        })
    }

    /// Overrides the bind address, e.g. from the command line.
    #[must_use]
    pub fn with_server_addr(mut self, addr: SocketAddr) -> Self {
        self.server_addr = addr;
        self
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    value.parse().map_err(|e: url::ParseError| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_number(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional(name) {
        Some(v) => v.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
