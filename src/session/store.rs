use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TokenHolder;

/// Server-side session persistence, keyed by the id in the session cookie.
///
/// A session holds nothing but its [`TokenHolder`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up a live session.
    async fn get(&self, session_id: &str) -> Option<Arc<TokenHolder>>;

    /// Creates or replaces a session.
    async fn put(&self, session_id: &str, tokens: Arc<TokenHolder>);

    /// Ends a session (logout, terminal refresh failure).
    async fn remove(&self, session_id: &str);
}

struct Entry {
    tokens: Arc<TokenHolder>,
    last_seen: Instant,
}

/// In-process [`SessionStore`] with an idle timeout.
///
/// Every successful lookup extends the session. Expired entries are dropped
/// when they are looked up and whenever a new session is stored.
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<Arc<TokenHolder>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            None => return None,
            Some(entry) if entry.last_seen.elapsed() < self.ttl => {
                entry.last_seen = Instant::now();
                return Some(Arc::clone(&entry.tokens));
            }
            Some(_) => {}
        }

        sessions.remove(session_id);
        tracing::debug!("Session expired");
        None
    }

    async fn put(&self, session_id: &str, tokens: Arc<TokenHolder>) {
        let mut sessions = self.sessions.write().await;
        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        sessions.insert(
            session_id.to_string(),
            Entry {
                tokens,
                last_seen: Instant::now(),
            },
        );
    }

    async fn remove(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }
}
