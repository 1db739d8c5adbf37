//! # CLI Module
//!
//! Command implementations behind the `spotshare` binary. `main` only parses
//! arguments and dispatches here.
//!
//! - [`serve`] - wires configuration, the Spotify client and the stores into an
//!   [`AppState`] and runs the HTTP server until it stops

use std::{net::SocketAddr, sync::Arc};

use crate::{
    Res,
    config::Settings,
    feed::JsonFileFeedStore,
    info,
    server::start_api_server,
    session::MemorySessionStore,
    spotify::SpotifyClient,
    state::AppState,
    warning,
};

pub async fn serve(addr: Option<SocketAddr>) -> Res<()> {
    let mut settings = Settings::from_env()?;
    if let Some(addr) = addr {
        settings = settings.with_server_addr(addr);
    }

    if std::env::var_os("COOKIE_KEY").is_none() {
        warning!("COOKIE_KEY not set, sessions will not survive a restart");
    }
    if !settings.secure_cookies {
        warning!("Secure cookies disabled, only use this over plain http in development");
    }

    let spotify = Arc::new(SpotifyClient::new(settings.spotify.clone())?);
    let sessions = Arc::new(MemorySessionStore::new(settings.session_ttl));
    let feed = Arc::new(JsonFileFeedStore::new(settings.feed_path.clone()));
    let addr = settings.server_addr;

    info!("Shared tracks stored in {}", settings.feed_path.display());

    let state = AppState::new(settings, spotify, sessions, feed);
    start_api_server(state, addr).await
}
