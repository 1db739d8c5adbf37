//! Shared-tracks feed: an append-only document store listed newest first.

mod store;

use async_trait::async_trait;

use crate::types::SharedTrack;

pub use store::{JsonFileFeedStore, MemoryFeedStore};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn insert(&self, track: SharedTrack) -> Result<(), FeedError>;

    /// All documents sorted by `shared_at`, newest first.
    async fn list_newest_first(&self) -> Result<Vec<SharedTrack>, FeedError>;
}

/// Newest first; among equal timestamps the later insert wins.
pub(crate) fn newest_first(mut tracks: Vec<SharedTrack>) -> Vec<SharedTrack> {
    tracks.reverse();
    tracks.sort_by(|a, b| b.shared_at.cmp(&a.shared_at));
    tracks
}
