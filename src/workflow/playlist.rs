use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::Error,
    info,
    spotify::MusicService,
    types::{AccessCredential, PlaylistReference, SubscriptionTier, TrackResolution},
    warning,
};

/// Spotify accepts at most this many URIs per add-tracks request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Upper bound on concurrent search requests for one playlist.
pub const MAX_CONCURRENT_SEARCHES: usize = 8;

#[derive(Debug, Clone)]
pub struct PlaylistOutcome {
    pub playlist: PlaylistReference,
    pub tier: SubscriptionTier,
    pub tracks_added: usize,
    pub unresolved: Vec<String>,
}

/// Creates a playlist named `title` and fills it with the given songs.
///
/// # Steps
///
/// 1. Resolve the owner via the profile (reused later for the tier check)
/// 2. Create the playlist container; on failure nothing else is called
/// 3. Resolve every song with a bounded number of concurrent searches,
///    keeping the requested order and duplicates; songs without a match are
///    left out, a failed search cancels the rest and fails the workflow
/// 4. Attach the resolved URIs in batches of [`MAX_TRACKS_PER_REQUEST`];
///    a failed batch leaves the already created playlist in place
/// 5. Report the subscription tier
///
/// # Errors
///
/// Returns the first [`Error`] met by any step. A song that simply has no
/// match is not an error.
pub async fn create_playlist(
    service: Arc<dyn MusicService>,
    credential: &AccessCredential,
    title: &str,
    songs: &[String],
) -> Result<PlaylistOutcome, Error> {
    let profile = service.get_profile(credential).await?;
    let playlist = service
        .create_playlist(credential, &profile.id, title)
        .await?;
    info!("Created playlist {} ({})", playlist.name, playlist.uri);

    let resolutions = resolve_tracks(&service, credential, songs).await?;

    let mut uris = Vec::new();
    let mut unresolved = Vec::new();
    for (song, resolution) in songs.iter().zip(resolutions) {
        match resolution {
            TrackResolution::Resolved(uri) => uris.push(uri),
            TrackResolution::Unresolved => unresolved.push(song.clone()),
        }
    }

    if !unresolved.is_empty() {
        warning!(
            "No match for {} of {} songs: {}",
            unresolved.len(),
            songs.len(),
            unresolved.join("; ")
        );
    }

    if uris.is_empty() {
        warning!("No songs resolved, playlist {} stays empty", playlist.name);
    }
    for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
        service.add_tracks(credential, &playlist.id, chunk).await?;
    }
    info!("Added {} tracks to playlist {}", uris.len(), playlist.name);

    Ok(PlaylistOutcome {
        playlist,
        tier: profile.tier(),
        tracks_added: uris.len(),
        unresolved,
    })
}

/// Searches every song with at most [`MAX_CONCURRENT_SEARCHES`] requests in
/// flight and returns the resolutions in song order.
///
/// The first failed search cancels every search still pending or running.
async fn resolve_tracks(
    service: &Arc<dyn MusicService>,
    credential: &AccessCredential,
    songs: &[String],
) -> Result<Vec<TrackResolution>, Error> {
    let limit = Arc::new(Semaphore::new(MAX_CONCURRENT_SEARCHES));
    let mut searches = JoinSet::new();
    for (index, song) in songs.iter().enumerate() {
        let service = Arc::clone(service);
        let credential = credential.clone();
        let song = song.clone();
        let limit = Arc::clone(&limit);
        searches.spawn(async move {
            let _permit = limit.acquire_owned().await;
            (index, service.search_track(&credential, &song).await)
        });
    }

    let mut resolutions = vec![TrackResolution::Unresolved; songs.len()];
    while let Some(joined) = searches.join_next().await {
        let (index, resolution) = match joined {
            Ok(result) => result,
            Err(e) => {
                searches.shutdown().await;
                return Err(e.into());
            }
        };
        match resolution {
            Ok(resolution) => resolutions[index] = resolution,
            Err(e) => {
                searches.shutdown().await;
                return Err(e);
            }
        }
    }
    Ok(resolutions)
}
