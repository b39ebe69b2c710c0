use reqwest::{Client, StatusCode};

use crate::{
    error::Error,
    spotify::expect_status,
    types::{AccessCredential, SearchResponse, TrackResolution},
};

/// Resolves a free-text song description to a track URI.
///
/// Calls `GET /search?q=<query>&type=track&limit=1` and takes the service's
/// highest ranked match. No fuzzy correction or retries are attempted.
///
/// # Returns
///
/// - `Ok(TrackResolution::Resolved(uri))` - the first match
/// - `Ok(TrackResolution::Unresolved)` - the search came back empty; this is
///   an expected outcome, not an error
///
/// # Errors
///
/// - [`Error::Service`] on any status other than 200
/// - [`Error::Transport`] on connection failures or a malformed body
pub async fn search_track(
    client: &Client,
    api_url: &str,
    credential: &AccessCredential,
    query: &str,
) -> Result<TrackResolution, Error> {
    let response = client
        .get(format!("{uri}/search", uri = api_url))
        .query(&[("q", query), ("type", "track"), ("limit", "1")])
        .bearer_auth(&credential.access_token)
        .send()
        .await?;

    let response = expect_status(response, StatusCode::OK, "search track").await?;
    let json = response.json::<SearchResponse>().await?;

    Ok(json
        .tracks
        .and_then(|page| page.items.into_iter().next())
        .map(|track| TrackResolution::Resolved(track.uri))
        .unwrap_or(TrackResolution::Unresolved))
}
