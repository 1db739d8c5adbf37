use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{
    config::Settings, feed::FeedStore, proxy::Dispatcher, session::SessionStore,
    spotify::SpotifyApi,
};

/// Everything a request handler needs, built once in `main` and cloned into
/// each request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub spotify: Arc<dyn SpotifyApi>,
    pub dispatcher: Dispatcher,
    pub sessions: Arc<dyn SessionStore>,
    pub feed: Arc<dyn FeedStore>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        spotify: Arc<dyn SpotifyApi>,
        sessions: Arc<dyn SessionStore>,
        feed: Arc<dyn FeedStore>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            dispatcher: Dispatcher::new(Arc::clone(&spotify)),
            spotify,
            sessions,
            feed,
        }
    }
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.settings.cookie_key.clone()
    }
}
