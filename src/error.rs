//! Error types for playlist-pilot.

use std::net::SocketAddr;

use thiserror::Error;

/// Failure of the authorization session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No callback arrived before the deadline.
    #[error("authentication timed out")]
    Timeout,

    /// The user denied access, the callback was invalid, or the token endpoint
    /// did not hand out an access token.
    #[error("authorization rejected: {0}")]
    Rejected(String),

    /// The callback listener could not bind its port.
    #[error("cannot bind callback listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The configured authorization endpoint is not a valid URL.
    #[error("invalid authorization url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The token exchange request did not complete.
    #[error("token exchange failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Main error type for playlist-pilot operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The remote service answered with an unexpected status.
    #[error("{operation} failed with status {status}{}", .body.as_deref().map(|b| format!(": {b}")).unwrap_or_default())]
    Service {
        operation: &'static str,
        status: u16,
        body: Option<String>,
    },

    /// Connection failure or malformed response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no devices found")]
    NoDevices,

    #[error("no playlist uri found")]
    NoPlaylist,

    /// A caller passed arguments the operation cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing or unparseable configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A background task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
