//! # Entry Points
//!
//! The operations exposed to the external dialog controller. Each takes plain
//! arguments, never panics, and answers with a uniform [`ToolResult`]:
//!
//! ```json
//! {"success": true, "premium": true, "playlist_uri": "spotify:playlist:..."}
//! {"success": false, "error": "no devices found"}
//! ```
//!
//! Failures are logged and turned into a message; the controller only needs
//! to tell success from failure and phrase the message for the user.
//!
//! - [`authenticate`] - obtain (or reuse) the user's credential
//! - [`create_playlist`] - build a playlist from a `;` separated song list
//! - [`start_playlist`] - play the playlist created last
//! - [`dispatch`] - route a JSON request `{"function": ..., "arguments": {...}}`

mod authenticate;
mod create_playlist;
mod start_playlist;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{error::Error, session::Session, warning};

pub use authenticate::authenticate;
pub use create_playlist::create_playlist;
pub use start_playlist::start_playlist;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// A successful result; `payload` fields are merged into the top level.
    pub fn ok(payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            success: true,
            payload,
            error: None,
        }
    }

    /// A failed result carrying `err` as its message. Logs the failure.
    pub fn failure(operation: &str, err: impl Display) -> Self {
        let message = err.to_string();
        warning!("{} failed: {}", operation, message);
        Self {
            success: false,
            payload: Map::new(),
            error: Some(message),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// A call from the dialog controller.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    pub function: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
struct CreatePlaylistArgs {
    title: String,
    songs: String,
}

/// Routes a controller request to the matching entry point.
///
/// Unknown functions and malformed arguments produce a failed result.
pub async fn dispatch(session: &Session, request: ToolRequest) -> ToolResult {
    match request.function.as_str() {
        "authenticate" | "authenticate_user" => authenticate(session).await,
        "create_playlist" => {
            match serde_json::from_value::<CreatePlaylistArgs>(request.arguments) {
                Ok(args) => create_playlist(session, &args.title, &args.songs).await,
                Err(e) => ToolResult::failure(
                    "create_playlist",
                    Error::InvalidArgument(e.to_string()),
                ),
            }
        }
        "start_playlist" => start_playlist(session).await,
        other => ToolResult::failure(
            other,
            Error::InvalidArgument(format!("unknown function {other}")),
        ),
    }
}

/// Function declarations the controller can register with its language model.
pub fn declarations() -> Value {
    json!([
        {
            "name": "authenticate",
            "description": "Attempts to authenticate the user with Spotify.",
            "parameters": null
        },
        {
            "name": "create_playlist",
            "description": "Create a playlist with the given title and songs. The result tells whether the user has a premium subscription, which is required for playback.",
            "parameters": {
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Title of the playlist"
                    },
                    "songs": {
                        "type": "string",
                        "description": "List of songs in the format '<artist> <song title>' separated by semicolons"
                    }
                },
                "required": ["title", "songs"]
            }
        },
        {
            "name": "start_playlist",
            "description": "Start playing the playlist created last on the user's first available device.",
            "parameters": null
        }
    ])
}
