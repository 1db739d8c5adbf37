use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::{FeedError, FeedStore, newest_first};
use crate::types::SharedTrack;

/// Keeps the feed in a pretty-printed JSON array on disk.
///
/// Writes are serialized through a mutex; each insert replaces the file
/// through a `.tmp` sibling.
pub struct JsonFileFeedStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileFeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<SharedTrack>, FeedError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn persist(&self, tracks: &[SharedTrack]) -> Result<(), FeedError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        // The feed file is only ever replaced whole.
        let json = serde_json::to_string_pretty(tracks)?;
        let staging = self.staging_path();
        async_fs::write(&staging, json).await?;
        async_fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FeedStore for JsonFileFeedStore {
    async fn insert(&self, track: SharedTrack) -> Result<(), FeedError> {
        let _guard = self.write_lock.lock().await;
        let mut tracks = self.load().await?;
        tracks.push(track);
        self.persist(&tracks).await
    }

    async fn list_newest_first(&self) -> Result<Vec<SharedTrack>, FeedError> {
        let _guard = self.write_lock.lock().await;
        Ok(newest_first(self.load().await?))
    }
}

#[derive(Default)]
pub struct MemoryFeedStore {
    tracks: RwLock<Vec<SharedTrack>>,
}

impl MemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn insert(&self, track: SharedTrack) -> Result<(), FeedError> {
        self.tracks.write().await.push(track);
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<SharedTrack>, FeedError> {
        Ok(newest_first(self.tracks.read().await.clone()))
    }
}
