use serde_json::json;

use crate::{
    error::Error,
    session::Session,
    tools::{ToolResult, authenticate::ensure_credential},
    types::PlaybackDevice,
    warning, workflow,
};

/// Plays the playlist created last on the first available device.
///
/// Fails with `no playlist uri found` before touching the network when no
/// playlist has been created in this session yet.
pub async fn start_playlist(session: &Session) -> ToolResult {
    match run(session).await {
        Ok(device) => ToolResult::ok(json!({ "device": device.name })),
        Err(e) => ToolResult::failure("start_playlist", e),
    }
}

async fn run(session: &Session) -> Result<PlaybackDevice, Error> {
    let playlist = session.playlist().get().await.ok_or(Error::NoPlaylist)?;
    let credential = ensure_credential(session).await?;

    if session.settings().open_playlist_in_app {
        // wakes the desktop app so it shows up as a playback device
        if let Err(e) = session.browser().open(&playlist.uri) {
            warning!("Failed to open {} in the Spotify app: {}", playlist.uri, e);
        }
    }

    workflow::start_playback(session.service().as_ref(), &credential, &playlist).await
}
