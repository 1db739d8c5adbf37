//! spotshare backend library
//!
//! Signs users in with Spotify (OAuth 2.0 authorization-code flow), keeps their
//! tokens in a server-side session and proxies a handful of read-only listening
//! queries, reshaped into small DTOs for the front-end. A shared-tracks feed
//! lets users post a track for everyone to see.
//!
//! # Modules
//!
//! - `api` - HTTP handlers
//! - `cli` - command implementations for the binary
//! - `config` - configuration from environment variables and `.env` files
//! - `error` - the error taxonomy and its HTTP mapping
//! - `feed` - shared-tracks document store
//! - `proxy` - authorized Spotify reads with refresh-and-replay
//! - `server` - router assembly and the listener
//! - `session` - token holder, session store and cookie handling
//! - `spotify` - Spotify accounts/Web API client
//! - `state` - shared handler state
//! - `types` - upstream payloads and DTOs
//! - `utils` - PKCE, random identifiers and small helpers
//!
//! # Example
//!
//! ```
//! use spotshare::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotshare::Res<()> {
//!     config::load_env().await?;
//!     cli::serve(None).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod proxy;
pub mod server;
pub mod session;
pub mod spotify;
pub mod state;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary boundary where errors of different modules meet. Library
/// code returns the typed errors of its module.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Serving on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal startup errors; request handling reports through `tracing`.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
