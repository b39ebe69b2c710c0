//! Playlist Pilot Library
//!
//! This library lets a dialog-driven controller authorize against Spotify on
//! behalf of a user and then build and play a playlist from a list of free-text
//! song descriptions. It includes modules for the local OAuth callback server,
//! the Spotify Web API client, the playlist workflow and the entry points the
//! controller calls.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared across the crate
//! - `management` - Process-scoped credential and playlist state
//! - `server` - Local HTTP listener for OAuth callbacks
//! - `session` - The context object handed to every entry point
//! - `spotify` - Spotify Web API client and authorization coordinator
//! - `tools` - Entry points exposed to the dialog controller
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `workflow` - Playlist creation and playback orchestration
//!
//! # Example
//!
//! ```
//! use playlist_pilot::{config, session::Session, tools};
//!
//! #[tokio::main]
//! async fn main() -> playlist_pilot::Res<()> {
//!     config::load_env().await?;
//!     let session = Session::new(config::Settings::from_env()?);
//!     let result = tools::authenticate(&session).await;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod session;
pub mod spotify;
pub mod tools;
pub mod types;
pub mod utils;
pub mod workflow;

pub use error::{AuthError, Error};

/// A convenient Result type alias for operations that may fail.
///
/// Used at the outer edges of the application (the binary and the CLI
/// helpers) where errors of different kinds are only reported, never
/// matched on. Library code returns [`Error`] or [`AuthError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Log records are written to stderr so stdout stays reserved for structured
/// tool results when running as a controller session.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Resolved {} songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this macro, for start-up failures that leave nothing
/// to recover. Library code reports errors as values.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures, including every failed entry point call.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser, navigate manually");
/// warning!("create_playlist failed: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
