use reqwest::{Client, StatusCode};

use crate::{
    error::Error,
    spotify::expect_status,
    types::{AccessCredential, Profile},
};

/// Fetches the profile of the authenticated user.
///
/// Calls `GET /me`. The profile carries the user id needed to own new
/// playlists and the `product` field the subscription tier is derived from.
///
/// # Errors
///
/// - [`Error::Service`] on any status other than 200
/// - [`Error::Transport`] on connection failures or a malformed body
pub async fn get_profile(
    client: &Client,
    api_url: &str,
    credential: &AccessCredential,
) -> Result<Profile, Error> {
    let response = client
        .get(format!("{uri}/me", uri = api_url))
        .bearer_auth(&credential.access_token)
        .send()
        .await?;

    let response = expect_status(response, StatusCode::OK, "get profile").await?;
    Ok(response.json::<Profile>().await?)
}
