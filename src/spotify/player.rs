use reqwest::{Client, StatusCode};

use crate::{
    error::Error,
    spotify::expect_status,
    types::{AccessCredential, DevicesResponse, PlaybackDevice, StartPlaybackRequest},
};

/// Lists the user's available playback devices in service order.
///
/// Calls `GET /me/player/devices`. Devices reported without an id cannot be
/// targeted by a play command and are left out.
///
/// # Errors
///
/// - [`Error::NoDevices`] when no targetable device is available
/// - [`Error::Service`] on any status other than 200
/// - [`Error::Transport`] on connection failures or a malformed body
pub async fn list_devices(
    client: &Client,
    api_url: &str,
    credential: &AccessCredential,
) -> Result<Vec<PlaybackDevice>, Error> {
    let response = client
        .get(format!("{uri}/me/player/devices", uri = api_url))
        .bearer_auth(&credential.access_token)
        .send()
        .await?;

    let response = expect_status(response, StatusCode::OK, "list devices").await?;
    let json = response.json::<DevicesResponse>().await?;

    let devices: Vec<PlaybackDevice> = json
        .devices
        .into_iter()
        .filter_map(|d| {
            d.id.map(|id| PlaybackDevice {
                id,
                name: d.name,
                kind: d.kind,
                is_active: d.is_active,
            })
        })
        .collect();

    if devices.is_empty() {
        return Err(Error::NoDevices);
    }
    Ok(devices)
}

/// Starts playback of `context_uri` on the given device.
///
/// Calls `PUT /me/player/play?device_id=<id>` with the playback context in
/// the body and expects `204 No Content`. The response body is kept in the
/// error since Spotify explains refusals there (e.g. premium required).
pub async fn start_playback(
    client: &Client,
    api_url: &str,
    credential: &AccessCredential,
    device_id: &str,
    context_uri: &str,
) -> Result<(), Error> {
    let body = StartPlaybackRequest {
        context_uri: context_uri.to_string(),
    };

    let response = client
        .put(format!("{uri}/me/player/play", uri = api_url))
        .query(&[("device_id", device_id)])
        .bearer_auth(&credential.access_token)
        .json(&body)
        .send()
        .await?;

    expect_status(response, StatusCode::NO_CONTENT, "start playback").await?;
    Ok(())
}
