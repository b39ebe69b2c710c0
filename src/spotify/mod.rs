//! # Spotify Integration Module
//!
//! This module is the integration layer between Playlist Pilot and the Spotify
//! Web API. It contains the authorization coordinator that obtains a user-scoped
//! bearer credential and a thin client with one narrowly contracted function per
//! remote call.
//!
//! ## Architecture
//!
//! ```text
//! Entry points (tools)
//!          ↓
//! Workflow (create playlist, start playback)
//!          ↓
//! MusicService trait ── SpotifyClient
//!     ├── user      GET  /me
//!     ├── search    GET  /search
//!     ├── playlist  POST /users/{id}/playlists, POST /playlists/{id}/tracks
//!     └── player    GET  /me/player/devices, PUT /me/player/play
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Call Contracts
//!
//! | Operation      | Method | Success | Failure signal                    |
//! |----------------|--------|---------|-----------------------------------|
//! | get_profile    | GET    | 200     | [`Error::Service`]                |
//! | search_track   | GET    | 200     | empty result → `Unresolved`       |
//! | create_playlist| POST   | 201     | [`Error::Service`]                |
//! | add_tracks     | POST   | 201     | [`Error::Service`]                |
//! | list_devices   | GET    | 200     | empty list → [`Error::NoDevices`] |
//! | start_playback | PUT    | 204     | [`Error::Service`] with body      |
//!
//! Every call is a single request/response exchange without retries.
//! Connection failures and malformed bodies surface as [`Error::Transport`].
//!
//! ## Authentication
//!
//! [`auth`] implements the authorization code flow with a confidential client:
//! a local listener receives the redirect, the code is exchanged at the token
//! endpoint with HTTP basic client credentials, and the resulting credential is
//! cached for the rest of the process.

pub mod auth;
pub mod player;
pub mod playlist;
pub mod search;
pub mod user;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    error::Error,
    types::{AccessCredential, PlaybackDevice, PlaylistReference, Profile, TrackResolution},
};

/// The remote calls the playlist workflow depends on.
///
/// [`SpotifyClient`] is the production implementation; tests substitute mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicService: Send + Sync {
    async fn get_profile(&self, credential: &AccessCredential) -> Result<Profile, Error>;

    async fn search_track(
        &self,
        credential: &AccessCredential,
        query: &str,
    ) -> Result<TrackResolution, Error>;

    async fn create_playlist(
        &self,
        credential: &AccessCredential,
        owner_id: &str,
        title: &str,
    ) -> Result<PlaylistReference, Error>;

    async fn add_tracks(
        &self,
        credential: &AccessCredential,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), Error>;

    async fn list_devices(&self, credential: &AccessCredential)
    -> Result<Vec<PlaybackDevice>, Error>;

    async fn start_playback(
        &self,
        credential: &AccessCredential,
        device_id: &str,
        context_uri: &str,
    ) -> Result<(), Error>;
}

/// Spotify Web API client over a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_url)
    }

    pub fn with_client(http: Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn get_profile(&self, credential: &AccessCredential) -> Result<Profile, Error> {
        user::get_profile(&self.http, &self.api_url, credential).await
    }

    async fn search_track(
        &self,
        credential: &AccessCredential,
        query: &str,
    ) -> Result<TrackResolution, Error> {
        search::search_track(&self.http, &self.api_url, credential, query).await
    }

    async fn create_playlist(
        &self,
        credential: &AccessCredential,
        owner_id: &str,
        title: &str,
    ) -> Result<PlaylistReference, Error> {
        playlist::create(&self.http, &self.api_url, credential, owner_id, title).await
    }

    async fn add_tracks(
        &self,
        credential: &AccessCredential,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), Error> {
        playlist::add_tracks(&self.http, &self.api_url, credential, playlist_id, uris).await
    }

    async fn list_devices(
        &self,
        credential: &AccessCredential,
    ) -> Result<Vec<PlaybackDevice>, Error> {
        player::list_devices(&self.http, &self.api_url, credential).await
    }

    async fn start_playback(
        &self,
        credential: &AccessCredential,
        device_id: &str,
        context_uri: &str,
    ) -> Result<(), Error> {
        player::start_playback(&self.http, &self.api_url, credential, device_id, context_uri)
            .await
    }
}

/// Passes the response through when it carries the expected status.
///
/// Any other status becomes [`Error::Service`] with the (non-empty) response
/// body attached.
pub(crate) async fn expect_status(
    response: Response,
    expected: StatusCode,
    operation: &'static str,
) -> Result<Response, Error> {
    if response.status() == expected {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .ok()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());

    Err(Error::Service {
        operation,
        status,
        body,
    })
}
