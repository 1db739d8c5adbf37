//! # Proxy Module
//!
//! Read-only Spotify queries executed on behalf of a signed-in session.
//!
//! - [`descriptor`] - the static request + mapper pair behind each `/api/*`
//!   route
//! - [`mappers`] - pure payload → DTO functions
//! - [`Dispatcher`] - the authorized-call wrapper with the refresh-once
//!   policy and the two-step related-artists lookup
//!
//! ## Failure Policy
//!
//! ```text
//! GET ──200/204──────────────────────────────▶ map
//!  │
//!  └─401─▶ refresh ──ok──▶ GET ──200/204─────▶ map
//!             │              └─anything else─▶ UpstreamUnavailable
//!             └─rejected─────────────────────▶ RefreshFailed
//! ```
//!
//! There is no backoff and no retry for other statuses.

pub mod descriptor;
mod dispatcher;
pub mod mappers;

pub use descriptor::Descriptor;
pub use dispatcher::Dispatcher;
