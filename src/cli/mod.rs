//! # CLI Module
//!
//! This module provides the command-line interface layer for Playlist Pilot. It
//! drives the same entry points a dialog controller would call and presents
//! the results with console feedback.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the Spotify authorization flow (spinner while the browser
//!   round trip is pending)
//! - [`playlist`] - Creates a playlist from a `;` separated song list and
//!   optionally starts playing it
//! - [`devices`] - Shows the user's playback devices as a table
//! - [`session`] - Serves the entry points over a JSON-lines protocol on
//!   stdin/stdout for an external dialog controller
//!
//! ## Process Scope
//!
//! Credentials and the current playlist live only as long as the process.
//! Every command therefore authorizes anew, and `playlist --play` creates and
//! plays within the same run. A `session` keeps both for its whole lifetime.
//!
//! ## Usage Patterns
//!
//! ```bash
//! playlist-pilot auth
//! playlist-pilot playlist --title "Road Trip" --songs "Queen Don't Stop Me Now;Toto Africa" --play
//! playlist-pilot devices
//! playlist-pilot session < requests.jsonl
//! ```

mod auth;
mod devices;
mod playlist;
mod session;

pub use auth::auth;
pub use devices::devices;
pub use playlist::playlist;
pub use session::{EventNarrator, session};
