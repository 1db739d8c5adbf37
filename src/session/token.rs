use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::{error::ApiError, spotify::SpotifyApi, types::TokenGrant};

struct Credentials {
    access_token: String,
    refresh_token: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Credential state of one signed-in user.
///
/// Minted once by the OAuth callback and shared by every request of the
/// session. The access token is swapped in place by [`TokenHolder::refresh`];
/// nothing here is ever written to disk or logged.
pub struct TokenHolder {
    credentials: RwLock<Credentials>,
    // At most one refresh exchange in flight per holder.
    refresh_lock: Mutex<()>,
}

impl TokenHolder {
    pub fn create(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            credentials: RwLock::new(Credentials {
                access_token: access_token.into(),
                refresh_token: refresh_token.into(),
                expires_at: None,
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Builds a holder from an `authorization_code` grant.
    ///
    /// The code exchange must hand out a refresh token; without one the
    /// session could never recover from an expired access token.
    pub fn from_grant(grant: TokenGrant) -> Result<Self, ApiError> {
        let refresh_token = grant
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::UpstreamUnavailable("token response without refresh_token".into())
            })?;

        Ok(Self {
            credentials: RwLock::new(Credentials {
                access_token: grant.access_token,
                refresh_token,
                expires_at: expiry(grant.expires_in),
            }),
            refresh_lock: Mutex::new(()),
        })
    }

    /// The token to attach to the next call. Validity is not checked here;
    /// Spotify tells us with a 401 when it is stale.
    pub async fn current_access_token(&self) -> String {
        self.credentials.read().await.access_token.clone()
    }

    /// Best-effort expiry as announced by the token endpoint.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.credentials.read().await.expires_at
    }

    /// Replaces the access token that Spotify just rejected.
    ///
    /// `stale_access_token` is the token the caller sent. If a concurrent
    /// request already swapped it, the fresh token is returned without another
    /// exchange. A rotated refresh token from the provider replaces the stored
    /// one; when the response carries none the previous one is kept.
    ///
    /// # Errors
    ///
    /// [`ApiError::RefreshFailed`] when the provider rejects the refresh token.
    /// The session is unusable after that and the caller has to sign in again.
    pub async fn refresh(
        &self,
        api: &dyn SpotifyApi,
        stale_access_token: &str,
    ) -> Result<String, ApiError> {
        let _in_flight = self.refresh_lock.lock().await;

        let refresh_token = {
            let credentials = self.credentials.read().await;
            if credentials.access_token != stale_access_token {
                return Ok(credentials.access_token.clone());
            }
            credentials.refresh_token.clone()
        };

        let grant = api.refresh_token(&refresh_token).await?;
        if grant.access_token.is_empty() {
            return Err(ApiError::RefreshFailed(
                "token endpoint returned an empty access_token".into(),
            ));
        }

        let mut credentials = self.credentials.write().await;
        credentials.access_token = grant.access_token;
        if let Some(rotated) = grant.refresh_token.filter(|t| !t.is_empty()) {
            credentials.refresh_token = rotated;
        }
        credentials.expires_at = expiry(grant.expires_in);

        tracing::debug!(expires_at = ?credentials.expires_at, "Access token refreshed");
        Ok(credentials.access_token.clone())
    }
}

impl std::fmt::Debug for TokenHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHolder")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn expiry(expires_in: Option<u64>) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(expires_in?).ok()?;
    Utc::now().checked_add_signed(Duration::seconds(secs))
}
