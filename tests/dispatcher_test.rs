mod common;

use std::sync::Arc;

use serde_json::json;

use common::FakeSpotify;
use spotshare::{
    error::ApiError,
    proxy::{Dispatcher, descriptor},
    session::TokenHolder,
    spotify::ApiRequest,
    types::{NowPlaying, TrackSummary},
};

fn dispatcher(fake: &Arc<FakeSpotify>) -> Dispatcher {
    Dispatcher::new(fake.clone())
}

fn two_tracks() -> serde_json::Value {
    json!({
        "items": [
            { "name": "Song X", "artists": [{ "name": "Artist Y" }] },
            { "name": "Song Z", "artists": [{ "name": "Artist Y" }, { "name": "Artist W" }] }
        ]
    })
}

#[tokio::test]
async fn test_top_tracks_recovers_from_stale_token() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/top/tracks", 401, json!({ "error": { "status": 401 } }));
    fake.on_refresh("A2", None);
    fake.on_get("/me/top/tracks", 200, two_tracks());

    let tokens = TokenHolder::create("A1", "R1");
    let tracks = dispatcher(&fake)
        .execute(&tokens, &descriptor::top_tracks())
        .await
        .unwrap();

    assert_eq!(
        tracks,
        vec![
            TrackSummary {
                name: "Song X".into(),
                artist: "Artist Y".into()
            },
            TrackSummary {
                name: "Song Z".into(),
                artist: "Artist Y, Artist W".into()
            },
        ]
    );

    // One refresh with R1, then the same request replayed with A2
    assert_eq!(fake.refresh_calls(), vec!["R1".to_string()]);
    assert_eq!(
        fake.gets(),
        vec![
            ("/me/top/tracks".to_string(), "A1".to_string()),
            ("/me/top/tracks".to_string(), "A2".to_string()),
        ]
    );
    assert_eq!(tokens.current_access_token().await, "A2");
}

#[tokio::test]
async fn test_second_401_is_not_retried() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/top/tracks", 401, json!({}));
    fake.on_refresh("A2", None);
    fake.on_get("/me/top/tracks", 401, json!({}));
    fake.on_get("/me/top/tracks", 200, two_tracks());

    let tokens = TokenHolder::create("A1", "R1");
    let result = dispatcher(&fake)
        .execute(&tokens, &descriptor::top_tracks())
        .await;

    assert!(matches!(result, Err(ApiError::UpstreamUnavailable(_))));
    assert_eq!(fake.get_count(), 2);
    assert_eq!(fake.refresh_calls().len(), 1);
}

#[tokio::test]
async fn test_success_without_refresh() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/top/tracks", 200, two_tracks());

    let tokens = TokenHolder::create("A1", "R1");
    let tracks = dispatcher(&fake)
        .execute(&tokens, &descriptor::top_tracks())
        .await
        .unwrap();

    assert_eq!(tracks.len(), 2);
    assert!(fake.refresh_calls().is_empty());
}

#[tokio::test]
async fn test_rejected_refresh_token_is_terminal() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/top/artists", 401, json!({}));
    fake.reject_refresh();

    let tokens = TokenHolder::create("A1", "R1");
    let result = dispatcher(&fake)
        .execute(&tokens, &descriptor::top_artists())
        .await;

    assert!(matches!(result, Err(ApiError::RefreshFailed(_))));
    // No replay after a failed refresh
    assert_eq!(fake.get_count(), 1);
}

#[tokio::test]
async fn test_other_errors_surface_without_refresh() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/top/tracks", 503, json!({ "error": "down" }));

    let tokens = TokenHolder::create("A1", "R1");
    let result = dispatcher(&fake)
        .execute(&tokens, &descriptor::top_tracks())
        .await;

    assert!(matches!(result, Err(ApiError::UpstreamUnavailable(_))));
    assert_eq!(fake.get_count(), 1);
    assert!(fake.refresh_calls().is_empty());
}

#[tokio::test]
async fn test_now_playing_no_content_is_idle() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/player/currently-playing", 204, serde_json::Value::Null);

    let tokens = TokenHolder::create("A1", "R1");
    let now = dispatcher(&fake)
        .execute(&tokens, &descriptor::now_playing())
        .await
        .unwrap();

    assert_eq!(now, NowPlaying::idle());
    assert_eq!(
        serde_json::to_value(&now).unwrap(),
        json!({ "is_playing": false, "item": null })
    );
    assert!(fake.refresh_calls().is_empty());
}

#[tokio::test]
async fn test_now_playing_401_then_no_content() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/player/currently-playing", 401, json!({}));
    fake.on_refresh("A2", None);
    fake.on_get("/me/player/currently-playing", 204, serde_json::Value::Null);

    let tokens = TokenHolder::create("A1", "R1");
    let now = dispatcher(&fake)
        .execute(&tokens, &descriptor::now_playing())
        .await
        .unwrap();

    assert_eq!(now, NowPlaying::idle());
    assert_eq!(fake.refresh_calls().len(), 1);
}

#[tokio::test]
async fn test_related_artists_not_found_skips_second_call() {
    let fake = FakeSpotify::new();
    fake.on_get("/search", 200, json!({ "artists": { "items": [] } }));

    let tokens = TokenHolder::create("A1", "R1");
    let result = dispatcher(&fake)
        .related_artists(&tokens, "Nobody At All")
        .await;

    assert!(matches!(result, Err(ApiError::NotFound)));
    assert_eq!(
        fake.gets(),
        vec![("/search".to_string(), "A1".to_string())]
    );
}

#[tokio::test]
async fn test_related_artists_composite() {
    let fake = FakeSpotify::new();
    fake.on_get(
        "/search",
        200,
        json!({ "artists": { "items": [
            { "id": "abc123", "name": "Artist Y" },
            { "id": "zzz999", "name": "Artist Y Tribute" }
        ] } }),
    );
    // The second step gets its own refresh-and-replay
    fake.on_get("/artists/abc123/related-artists", 401, json!({}));
    fake.on_refresh("A2", None);
    fake.on_get(
        "/artists/abc123/related-artists",
        200,
        json!({ "artists": [
            {
                "id": "r1",
                "name": "Related One",
                "popularity": 71,
                "genres": ["indie"],
                "images": [{ "url": "https://i.scdn.co/image/r1", "width": 640 }]
            },
            { "id": "r2", "name": "Related Two", "popularity": 12, "genres": [], "images": [] }
        ] }),
    );

    let tokens = TokenHolder::create("A1", "R1");
    let related = dispatcher(&fake)
        .related_artists(&tokens, "Artist Y")
        .await
        .unwrap();

    assert_eq!(related.len(), 2);
    assert_eq!(related[0].id, "r1");
    assert_eq!(related[0].popularity, Some(71));
    assert_eq!(related[0].image.as_deref(), Some("https://i.scdn.co/image/r1"));
    assert_eq!(related[1].image, None);

    assert_eq!(
        fake.gets(),
        vec![
            ("/search".to_string(), "A1".to_string()),
            ("/artists/abc123/related-artists".to_string(), "A1".to_string()),
            ("/artists/abc123/related-artists".to_string(), "A2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_related_artists_second_call_failure() {
    let fake = FakeSpotify::new();
    fake.on_get("/search", 200, json!({ "artists": { "items": [{ "id": "abc123" }] } }));
    fake.on_get("/artists/abc123/related-artists", 404, json!({}));

    let tokens = TokenHolder::create("A1", "R1");
    let result = dispatcher(&fake).related_artists(&tokens, "Artist Y").await;

    assert!(matches!(result, Err(ApiError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn test_authorized_get_passes_query() {
    let fake = FakeSpotify::new();
    fake.on_get("/me", 200, json!({ "id": "user" }));

    let tokens = TokenHolder::create("A1", "R1");
    let request = ApiRequest::new("/me").param("market", "from_token");
    let payload = dispatcher(&fake)
        .authorized_get(&tokens, &request)
        .await
        .unwrap();

    assert_eq!(payload, Some(json!({ "id": "user" })));
    assert_eq!(request.query, vec![("market".to_string(), "from_token".to_string())]);
}

#[tokio::test]
async fn test_invalid_json_is_upstream_error() {
    let fake = FakeSpotify::new();
    fake.on_get("/me/top/tracks", 200, json!("not an object"));

    let tokens = TokenHolder::create("A1", "R1");
    let result = dispatcher(&fake)
        .execute(&tokens, &descriptor::top_tracks())
        .await;

    assert!(matches!(result, Err(ApiError::UpstreamUnavailable(_))));
}
