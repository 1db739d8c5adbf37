//! Pure reshaping of Spotify payloads into front-end DTOs.
//!
//! Each mapper takes the decoded body of one endpoint, `None` standing for an
//! empty (204) response, and never fails on a missing optional field.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::ApiError,
    types::{
        Artist, ArtistSearchResponse, ArtistSummary, CurrentlyPlaying, NowPlaying, Paging,
        PlayHistory, RecentTrack, RelatedArtist, RelatedArtistsResponse, Track, TrackDetail,
        TrackSummary,
    },
    utils::{first_image_url, join_artist_names},
};

fn decode<T: DeserializeOwned + Default>(payload: Option<Value>) -> Result<T, ApiError> {
    match payload {
        None => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::UpstreamUnavailable(format!("unexpected payload: {e}"))),
    }
}

pub fn track_summary(track: &Track) -> TrackSummary {
    TrackSummary {
        name: track.name.clone(),
        artist: join_artist_names(&track.artists),
    }
}

pub fn track_detail(track: &Track) -> TrackDetail {
    TrackDetail {
        name: track.name.clone(),
        artist: join_artist_names(&track.artists),
        album: track
            .album
            .as_ref()
            .map(|a| a.name.clone())
            .filter(|name| !name.is_empty()),
        image_url: track.album.as_ref().and_then(|a| first_image_url(&a.images)),
    }
}

pub fn related_artist(artist: &Artist) -> RelatedArtist {
    RelatedArtist {
        id: artist.id.clone(),
        name: artist.name.clone(),
        popularity: artist.popularity,
        genres: artist.genres.clone(),
        image: first_image_url(&artist.images),
    }
}

pub fn track_summaries(payload: Option<Value>) -> Result<Vec<TrackSummary>, ApiError> {
    let page: Paging<Track> = decode(payload)?;
    Ok(page.items.iter().map(track_summary).collect())
}

pub fn track_details(payload: Option<Value>) -> Result<Vec<TrackDetail>, ApiError> {
    let page: Paging<Track> = decode(payload)?;
    Ok(page.items.iter().map(track_detail).collect())
}

pub fn artist_summaries(payload: Option<Value>) -> Result<Vec<ArtistSummary>, ApiError> {
    let page: Paging<Artist> = decode(payload)?;
    Ok(page
        .items
        .iter()
        .map(|artist| ArtistSummary {
            name: artist.name.clone(),
            genres: artist.genres.join(", "),
        })
        .collect())
}

/// No content means nothing is playing.
pub fn now_playing(payload: Option<Value>) -> Result<NowPlaying, ApiError> {
    if payload.is_none() {
        return Ok(NowPlaying::idle());
    }

    let current: CurrentlyPlaying = decode(payload)?;
    Ok(NowPlaying {
        is_playing: current.is_playing,
        item: current.item.as_ref().map(track_detail),
    })
}

pub fn recently_played(payload: Option<Value>) -> Result<Vec<RecentTrack>, ApiError> {
    let page: Paging<PlayHistory> = decode(payload)?;
    Ok(page
        .items
        .iter()
        .map(|entry| RecentTrack {
            name: entry.track.name.clone(),
            artist: join_artist_names(&entry.track.artists),
            played_at: entry.played_at.clone(),
        })
        .collect())
}

/// First search hit only. A hit without an id cannot be looked up and
/// counts as no match.
pub fn first_artist(payload: Option<Value>) -> Result<Option<Artist>, ApiError> {
    let search: ArtistSearchResponse = decode(payload)?;
    Ok(search
        .artists
        .items
        .into_iter()
        .next()
        .filter(|artist| !artist.id.is_empty()))
}

pub fn related_artists(payload: Option<Value>) -> Result<Vec<RelatedArtist>, ApiError> {
    let related: RelatedArtistsResponse = decode(payload)?;
    Ok(related.artists.iter().map(related_artist).collect())
}
