use serde_json::Value;

use super::mappers;
use crate::{
    error::ApiError,
    spotify::ApiRequest,
    types::{
        Artist, ArtistSummary, NowPlaying, RecentTrack, RelatedArtist, TrackDetail, TrackSummary,
    },
};

pub type Mapper<T> = fn(Option<Value>) -> Result<T, ApiError>;

/// One proxied query: what to ask Spotify and how to reshape the answer.
pub struct Descriptor<T> {
    pub request: ApiRequest,
    pub mapper: Mapper<T>,
}

impl<T> Descriptor<T> {
    pub fn new(request: ApiRequest, mapper: Mapper<T>) -> Self {
        Self { request, mapper }
    }
}

/// `GET /api/tracks`
pub fn top_tracks() -> Descriptor<Vec<TrackSummary>> {
    Descriptor::new(
        ApiRequest::new("/me/top/tracks").param("limit", "10"),
        mappers::track_summaries,
    )
}

/// `GET /api/top-tracks`, with album art for sharing.
pub fn top_tracks_detailed() -> Descriptor<Vec<TrackDetail>> {
    Descriptor::new(
        ApiRequest::new("/me/top/tracks")
            .param("limit", "20")
            .param("time_range", "short_term"),
        mappers::track_details,
    )
}

pub fn top_artists() -> Descriptor<Vec<ArtistSummary>> {
    Descriptor::new(
        ApiRequest::new("/me/top/artists").param("limit", "10"),
        mappers::artist_summaries,
    )
}

pub fn now_playing() -> Descriptor<NowPlaying> {
    Descriptor::new(
        ApiRequest::new("/me/player/currently-playing"),
        mappers::now_playing,
    )
}

pub fn recently_played() -> Descriptor<Vec<RecentTrack>> {
    Descriptor::new(
        ApiRequest::new("/me/player/recently-played").param("limit", "10"),
        mappers::recently_played,
    )
}

pub fn artist_search(name: &str) -> Descriptor<Option<Artist>> {
    Descriptor::new(
        ApiRequest::new("/search")
            .param("q", name)
            .param("type", "artist")
            .param("limit", "1"),
        mappers::first_artist,
    )
}

pub fn related_artists(artist_id: &str) -> Descriptor<Vec<RelatedArtist>> {
    Descriptor::new(
        ApiRequest::new(format!("/artists/{artist_id}/related-artists")),
        mappers::related_artists,
    )
}
