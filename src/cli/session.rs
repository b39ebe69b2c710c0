use async_trait::async_trait;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    Res,
    error::Error,
    info,
    session::{Narrator, Session},
    tools::{self, ToolRequest, ToolResult},
};

/// [`Narrator`] that emits progress remarks as protocol events on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventNarrator;

#[async_trait]
impl Narrator for EventNarrator {
    async fn say(&self, text: &str) {
        println!("{}", json!({ "event": "progress", "message": text }));
    }
}

/// Serves entry point calls to a dialog controller over stdin/stdout.
///
/// # Protocol
///
/// One JSON object per line in both directions. On start a `ready` event
/// lists the function declarations:
///
/// ```text
/// > {"event":"ready","functions":[...]}
/// < {"function":"authenticate"}
/// > {"success":true,"scopes":[...]}
/// < {"function":"create_playlist","arguments":{"title":"Chill","songs":"A;B"}}
/// > {"event":"progress","message":"Alright, one moment please."}
/// > {"success":true,"premium":true,...}
/// ```
///
/// The session ends when stdin is closed. Log records go to stderr.
pub async fn session(session: Session) -> Res<()> {
    println!(
        "{}",
        json!({ "event": "ready", "functions": tools::declarations() })
    );
    info!("Session ready, waiting for requests on stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<ToolRequest>(line) {
            Ok(request) => tools::dispatch(&session, request).await,
            Err(e) => ToolResult::failure("session", Error::InvalidArgument(e.to_string())),
        };
        println!("{}", serde_json::to_string(&result)?);
    }

    info!("Input closed, ending session");
    Ok(())
}
