//! Session-scoped credential state.
//!
//! - [`TokenHolder`] - access/refresh tokens of one signed-in user, with
//!   single-flight refresh
//! - [`SessionStore`] - where holders live between requests, keyed by the
//!   session cookie
//! - [`Authenticated`] - extractor that resolves the cookie to a holder

pub mod cookies;
mod extractor;
mod store;
mod token;

pub use extractor::Authenticated;
pub use store::{MemorySessionStore, SessionStore};
pub use token::TokenHolder;
