//! Playlist orchestration.
//!
//! Composes the [`MusicService`](crate::spotify::MusicService) calls into the
//! two multi-step operations the entry points expose. Each step either
//! succeeds or the workflow returns the first error it meets; nothing already
//! created remotely is rolled back.

mod playback;
mod playlist;

pub use playback::start_playback;
pub use playlist::{
    MAX_CONCURRENT_SEARCHES, MAX_TRACKS_PER_REQUEST, PlaylistOutcome, create_playlist,
};
