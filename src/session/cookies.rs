use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub const SESSION_COOKIE_NAME: &str = "spotshare_session";
const STATE_COOKIE_NAME: &str = "spotshare_oauth_state";
const PKCE_COOKIE_NAME: &str = "spotshare_pkce";

/// The consent round trip has to finish within this window.
const OAUTH_COOKIE_TTL_MINUTES: i64 = 10;

/// Create state + PKCE verifier cookies for the authorization request.
pub fn oauth_cookies(
    state: &str,
    code_verifier: &str,
    secure: bool,
) -> (Cookie<'static>, Cookie<'static>) {
    let build = |name: &'static str, value: &str| {
        Cookie::build((name, value.to_string()))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::minutes(OAUTH_COOKIE_TTL_MINUTES))
            .build()
    };

    (build(STATE_COOKIE_NAME, state), build(PKCE_COOKIE_NAME, code_verifier))
}

/// Removal cookies for state + PKCE verifier.
pub fn clear_oauth_cookies() -> (Cookie<'static>, Cookie<'static>) {
    (
        Cookie::build((STATE_COOKIE_NAME, "")).path("/").build(),
        Cookie::build((PKCE_COOKIE_NAME, "")).path("/").build(),
    )
}

/// Browser-session cookie without `Max-Age`; idle expiry is up to the
/// session store, which extends a session on every request.
pub fn session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
}

pub fn session_id(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn oauth_state(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(STATE_COOKIE_NAME).map(|c| c.value().to_string())
}

pub fn pkce_verifier(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(PKCE_COOKIE_NAME).map(|c| c.value().to_string())
}
