//! # API Module
//!
//! HTTP handlers served by the short-lived local callback listener during an
//! authorization session.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Spotify's redirect carrying either an
//!   authorization `code` or an `error`, checks the `state` parameter and
//!   resolves the session's completion signal exactly once. The browser gets
//!   a short human-readable page in return.
//! - [`health`] - Reports the crate version and whether the session is still
//!   waiting for its redirect.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use playlist_pilot::api::{callback, health, CallbackState};
//!
//! let app = Router::new()
//!     .route("/health", get(health))
//!     .route("/callback", get(callback))
//!     .layer(Extension(state));
//! ```

mod callback;
mod health;

pub use callback::{CallbackOutcome, CallbackState, callback};
pub use health::health;
