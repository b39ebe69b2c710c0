use crate::{
    error::Error,
    info,
    spotify::MusicService,
    types::{AccessCredential, PlaybackDevice, PlaylistReference},
};

/// Starts playing `playlist` on the first available device.
///
/// Devices are queried on every call since availability changes between
/// conversation turns. The first device in service order is used without
/// any ranking.
///
/// # Errors
///
/// - [`Error::NoDevices`] when no device is available; playback is not attempted
/// - [`Error::Service`] when the play command is refused
pub async fn start_playback(
    service: &dyn MusicService,
    credential: &AccessCredential,
    playlist: &PlaylistReference,
) -> Result<PlaybackDevice, Error> {
    let devices = service.list_devices(credential).await?;
    let device = devices.into_iter().next().ok_or(Error::NoDevices)?;

    service
        .start_playback(credential, &device.id, &playlist.uri)
        .await?;
    info!("Playlist {} is now playing on {}", playlist.name, device.name);

    Ok(device)
}
