//! Configuration management for Playlist Pilot.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, callback server settings and
//! the timing of the authorization flow.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use crate::error::Error;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPES: &str = "playlist-modify-public playlist-modify-private user-read-playback-state user-modify-playback-state user-read-private";

/// Must match the port of the redirect URI registered with Spotify.
pub const DEFAULT_CALLBACK_PORT: u16 = 8585;
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_AUTH_DWELL: Duration = Duration::from_secs(8);

/// Loads environment variables from `.env` files.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `playlist-pilot/.env`, followed by a `.env` in
/// the working directory. Variables already present in the process
/// environment are never overridden, and missing files are skipped.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/playlist-pilot/.env`
/// - macOS: `~/Library/Application Support/playlist-pilot/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-pilot/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created.
///
/// # Example
///
/// ```
/// use playlist_pilot::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-pilot/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    dotenv::dotenv().ok();
    Ok(())
}

/// Runtime settings for one session.
///
/// Fields are public so callers (and tests) can start from [`Settings::new`]
/// and override what they need with struct update syntax.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scopes: Vec<String>,
    pub callback_port: u16,
    /// Upper bound for the whole browser-mediated wait.
    pub auth_timeout: Duration,
    /// Time granted to the user before the callback is awaited.
    pub auth_dwell: Duration,
    pub open_playlist_in_app: bool,
}

impl Settings {
    /// Creates settings with Spotify's public endpoints and default timings.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            scopes: parse_scopes(DEFAULT_SCOPES),
            callback_port: DEFAULT_CALLBACK_PORT,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            auth_dwell: DEFAULT_AUTH_DWELL,
            open_playlist_in_app: true,
        }
    }

    /// Builds settings from the process environment.
    ///
    /// # Required Variables
    ///
    /// - `SPOTIFY_API_AUTH_CLIENT_ID` - client id of the registered application
    /// - `SPOTIFY_API_AUTH_CLIENT_SECRET` - client secret used for the token exchange
    ///
    /// # Optional Variables
    ///
    /// - `SPOTIFY_API_AUTH_URL`, `SPOTIFY_API_TOKEN_URL`, `SPOTIFY_API_URL` - endpoints
    /// - `SPOTIFY_API_AUTH_SCOPE` - space separated scope list
    /// - `CALLBACK_PORT` - local port of the redirect URI (default 8585)
    /// - `AUTH_TIMEOUT_SECS` / `AUTH_DWELL_SECS` - authorization timing
    /// - `OPEN_PLAYLIST_IN_APP` - open the playlist in the desktop app before playback
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or an
    /// optional one cannot be parsed.
    pub fn from_env() -> Result<Self, Error> {
        let mut settings = Self::new(
            required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
        );

        if let Ok(url) = env::var("SPOTIFY_API_AUTH_URL") {
            settings.auth_url = url;
        }
        if let Ok(url) = env::var("SPOTIFY_API_TOKEN_URL") {
            settings.token_url = url;
        }
        if let Ok(url) = env::var("SPOTIFY_API_URL") {
            settings.api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(scope) = env::var("SPOTIFY_API_AUTH_SCOPE") {
            settings.scopes = parse_scopes(&scope);
        }
        if let Some(port) = optional::<u16>("CALLBACK_PORT")? {
            settings.callback_port = port;
        }
        if let Some(secs) = optional::<u64>("AUTH_TIMEOUT_SECS")? {
            settings.auth_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = optional::<u64>("AUTH_DWELL_SECS")? {
            settings.auth_dwell = Duration::from_secs(secs);
        }
        if let Some(open) = optional::<bool>("OPEN_PLAYLIST_IN_APP")? {
            settings.open_playlist_in_app = open;
        }

        Ok(settings)
    }

    /// The redirect URI registered with Spotify, e.g. `http://127.0.0.1:8585/callback`.
    pub fn redirect_uri(&self) -> String {
        format!(
            "http://{ip}:{port}/callback",
            ip = Ipv4Addr::LOCALHOST,
            port = self.callback_port
        )
    }

    /// Loopback address the callback listener binds to.
    pub fn callback_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.callback_port))
    }
}

/// Splits a space (or `+`) separated scope string.
pub fn parse_scopes(scope: &str) -> Vec<String> {
    scope
        .split(|c: char| c.is_whitespace() || c == '+')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(key: &str) -> Result<String, Error> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{key} must be set"))),
    }
}

fn optional<T: FromStr>(key: &str) -> Result<Option<T>, Error> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {value}"))),
        Err(_) => Ok(None),
    }
}
