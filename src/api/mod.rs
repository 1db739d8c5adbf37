//! # API Module
//!
//! HTTP handlers of the spotshare server.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /auth/spotify`, starts the authorization-code flow
//! - [`callback`] - `GET /callback`, redeems the code and opens a session
//! - [`logout`] - `GET /logout`
//! - [`dashboard`] - `GET /dashboard`, only for signed-in users
//!
//! ### Listening Stats
//!
//! Proxied through [`crate::proxy::Dispatcher`]; all of them answer `401`
//! without a session.
//!
//! - [`tracks`], [`top_tracks`], [`artists`], [`now_playing`],
//!   [`recently_played`], [`related_artists`]
//!
//! ### Shared Tracks
//!
//! - [`share`] - `POST /api/share`
//! - [`shared_tracks`] - `GET /api/shared-tracks`
//!
//! ### Monitoring
//!
//! - [`health`] - status and version

mod auth;
mod health;
mod share;
mod stats;

pub use auth::{callback, dashboard, login, logout};
pub use health::health;
pub use share::{share, shared_tracks};
pub use stats::{artists, now_playing, recently_played, related_artists, top_tracks, tracks};
