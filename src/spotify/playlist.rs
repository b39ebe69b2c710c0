use reqwest::{Client, StatusCode};

use crate::{
    error::Error,
    spotify::expect_status,
    types::{
        AccessCredential, AddTrackToPlaylistRequest, CreatePlaylistRequest, PlaylistReference,
    },
};

/// Creates a private playlist owned by `owner_id`.
///
/// Calls `POST /users/{owner_id}/playlists` and expects `201 Created`.
///
/// # Returns
///
/// The reference (id, canonical URI and name) of the new playlist.
///
/// # Errors
///
/// - [`Error::Service`] on any status other than 201
/// - [`Error::Transport`] on connection failures or a malformed body
pub async fn create(
    client: &Client,
    api_url: &str,
    credential: &AccessCredential,
    owner_id: &str,
    title: &str,
) -> Result<PlaylistReference, Error> {
    let body = CreatePlaylistRequest {
        name: title.to_string(),
        public: false,
        description: None,
    };

    let response = client
        .post(format!(
            "{uri}/users/{user_id}/playlists",
            uri = api_url,
            user_id = owner_id
        ))
        .bearer_auth(&credential.access_token)
        .json(&body)
        .send()
        .await?;

    let response = expect_status(response, StatusCode::CREATED, "create playlist").await?;
    Ok(response.json::<PlaylistReference>().await?)
}

/// Appends tracks to a playlist.
///
/// Calls `POST /playlists/{playlist_id}/tracks` with the given URIs in one
/// request and expects `201 Created`. Callers keep batches within the
/// service's limit of 100 URIs.
pub async fn add_tracks(
    client: &Client,
    api_url: &str,
    credential: &AccessCredential,
    playlist_id: &str,
    uris: &[String],
) -> Result<(), Error> {
    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
    };

    let response = client
        .post(format!(
            "{uri}/playlists/{playlist_id}/tracks",
            uri = api_url,
            playlist_id = playlist_id
        ))
        .bearer_auth(&credential.access_token)
        .json(&body)
        .send()
        .await?;

    expect_status(response, StatusCode::CREATED, "add tracks").await?;
    Ok(())
}
