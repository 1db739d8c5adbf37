use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{Image, SimpleArtist};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

/// Opaque identifier carried by the session cookie.
pub fn generate_session_id() -> String {
    random_alphanumeric(48)
}

/// `"Artist Y, Artist W"`; empty when there are no artists.
pub fn join_artist_names(artists: &[SimpleArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// URL of the first image, if any. Spotify orders images widest first.
pub fn first_image_url(images: &[Image]) -> Option<String> {
    images
        .first()
        .map(|i| i.url.clone())
        .filter(|url| !url.is_empty())
}
