use serde_json::json;

use crate::{
    error::Error,
    session::Session,
    tools::{ToolResult, authenticate::ensure_credential},
    utils,
    workflow::{self, PlaylistOutcome},
};

/// Creates a playlist from a `;` separated song list.
///
/// Emits a progress remark sized to the number of songs, authenticates if
/// needed, runs the playlist workflow and remembers the new playlist for
/// [`start_playlist`](crate::tools::start_playlist).
///
/// # Result Payload
///
/// - `premium` - whether the user can start playback
/// - `playlist_uri` - canonical URI of the new playlist
/// - `tracks_added` - number of songs that were found and attached
/// - `unresolved` - songs without a match
pub async fn create_playlist(session: &Session, title: &str, songs: &str) -> ToolResult {
    let songs = utils::parse_songs(songs);

    match run(session, title.trim(), &songs).await {
        Ok(outcome) => {
            session.playlist().replace(outcome.playlist.clone()).await;
            ToolResult::ok(json!({
                "premium": outcome.tier.is_premium(),
                "playlist_uri": outcome.playlist.uri,
                "tracks_added": outcome.tracks_added,
                "unresolved": outcome.unresolved,
            }))
        }
        Err(e) => ToolResult::failure("create_playlist", e),
    }
}

async fn run(session: &Session, title: &str, songs: &[String]) -> Result<PlaylistOutcome, Error> {
    if title.is_empty() {
        return Err(Error::InvalidArgument("playlist title is empty".to_string()));
    }
    if songs.is_empty() {
        return Err(Error::InvalidArgument("song list is empty".to_string()));
    }

    session
        .narrator()
        .say(utils::progress_remark(songs.len()))
        .await;

    let credential = ensure_credential(session).await?;
    workflow::create_playlist(session.service(), &credential, title, songs).await
}
