use crate::{cli::auth, info, session::Session, success, tools, warning};

pub async fn playlist(session: &Session, title: String, songs: String, play: bool) {
    if !auth(session).await {
        return;
    }

    info!("Creating playlist {}", title);
    let result = tools::create_playlist(session, &title, &songs).await;
    if !result.success {
        warning!(
            "Cannot create playlist. Err: {}",
            result.error.unwrap_or_default()
        );
        return;
    }

    let added = result
        .get("tracks_added")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let uri = result
        .get("playlist_uri")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    success!("Playlist {} created with {} tracks ({})", title, added, uri);

    if let Some(unresolved) = result.get("unresolved").and_then(|v| v.as_array()) {
        for song in unresolved.iter().filter_map(|s| s.as_str()) {
            warning!("No match found for {}", song);
        }
    }

    if !play {
        return;
    }

    let premium = result
        .get("premium")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if !premium {
        warning!("Playback requires a Spotify Premium subscription.");
        return;
    }

    let playback = tools::start_playlist(session).await;
    if playback.success {
        let device = playback
            .get("device")
            .and_then(|v| v.as_str())
            .unwrap_or("your device");
        success!("Playing {} on {}", title, device);
    } else {
        warning!(
            "Cannot start playback. Err: {}",
            playback.error.unwrap_or_default()
        );
    }
}
