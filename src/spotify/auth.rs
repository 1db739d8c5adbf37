use url::Url;

use crate::{config::SpotifySettings, utils};

/// A freshly started authorization-code flow.
///
/// `state` and `code_verifier` have to survive the round trip through
/// Spotify's consent page; the login handler keeps them in private cookies.
pub struct AuthorizationRequest {
    pub url: Url,
    pub state: String,
    pub code_verifier: String,
}

/// Builds the Spotify authorization URL for a new login.
///
/// Generates a random `state` for CSRF protection and a PKCE verifier whose
/// S256 challenge is sent along. The code is later redeemed by
/// [`SpotifyApi::exchange_code`](super::SpotifyApi::exchange_code) together
/// with the client secret and the verifier.
///
/// # Example
///
/// ```
/// let request = authorization_request(&settings.spotify);
/// // redirect the browser to request.url
/// ```
pub fn authorization_request(settings: &SpotifySettings) -> AuthorizationRequest {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let mut url = settings.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", settings.redirect_uri.as_str())
        .append_pair("scope", &settings.scope)
        .append_pair("state", &state)
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", &code_challenge);

    AuthorizationRequest {
        url,
        state,
        code_verifier,
    }
}
