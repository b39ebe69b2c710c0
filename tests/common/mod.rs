#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use playlist_pilot::{
    config::Settings,
    session::{Narrator, Session},
    spotify::{SpotifyClient, auth::Browser},
    types::{AccessCredential, PlaylistReference},
};
use serde_json::json;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";

pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn basic_auth_header() -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{CLIENT_ID}:{CLIENT_SECRET}"))
    )
}

/// Settings pointing every endpoint at the mock server.
pub fn settings(server: &MockServer) -> Settings {
    Settings {
        auth_url: format!("{}/authorize", server.uri()),
        token_url: format!("{}/api/token", server.uri()),
        api_url: server.uri(),
        callback_port: free_port(),
        auth_timeout: Duration::from_secs(5),
        auth_dwell: Duration::ZERO,
        open_playlist_in_app: false,
        ..Settings::new(CLIENT_ID, CLIENT_SECRET)
    }
}

enum Reply {
    Code(String),
    Deny(String),
    Idle,
}

/// Stands in for the user's browser: records every URL and, for consent
/// pages, follows the redirect back to the local listener.
pub struct ScriptedBrowser {
    reply: Reply,
    opened: Mutex<Vec<String>>,
}

impl ScriptedBrowser {
    pub fn approving(code: &str) -> Arc<Self> {
        Self::with(Reply::Code(code.to_string()))
    }

    pub fn denying(reason: &str) -> Arc<Self> {
        Self::with(Reply::Deny(reason.to_string()))
    }

    pub fn idle() -> Arc<Self> {
        Self::with(Reply::Idle)
    }

    fn with(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn consent_pages_opened(&self) -> usize {
        self.opened()
            .iter()
            .filter(|url| url.contains("response_type=code"))
            .count()
    }
}

impl Browser for ScriptedBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        self.opened.lock().unwrap().push(url.to_string());

        let parsed = Url::parse(url).map_err(|e| e.to_string())?;
        let params: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        let (Some(redirect), Some(state)) = (params.get("redirect_uri"), params.get("state"))
        else {
            return Ok(());
        };

        let query = match &self.reply {
            Reply::Code(code) => format!("code={code}&state={state}"),
            Reply::Deny(reason) => format!("error={reason}&state={state}"),
            Reply::Idle => return Ok(()),
        };
        let target = format!("{redirect}?{query}");
        tokio::spawn(async move {
            let _ = reqwest::get(target).await;
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNarrator {
    said: Mutex<Vec<String>>,
}

impl RecordingNarrator {
    pub fn said(&self) -> Vec<String> {
        self.said.lock().unwrap().clone()
    }
}

#[async_trait]
impl Narrator for RecordingNarrator {
    async fn say(&self, text: &str) {
        self.said.lock().unwrap().push(text.to_string());
    }
}

pub struct Harness {
    pub session: Session,
    pub browser: Arc<ScriptedBrowser>,
    pub narrator: Arc<RecordingNarrator>,
}

pub fn harness(settings: Settings, browser: Arc<ScriptedBrowser>) -> Harness {
    let narrator = Arc::new(RecordingNarrator::default());
    let http = reqwest::Client::new();
    let service = Arc::new(SpotifyClient::with_client(
        http.clone(),
        settings.api_url.clone(),
    ));
    let session = Session::with_parts(
        settings,
        http,
        service,
        browser.clone(),
        narrator.clone(),
    );
    Harness {
        session,
        browser,
        narrator,
    }
}

/// A harness whose session already holds a credential.
pub async fn authenticated(settings: Settings) -> Harness {
    let harness = harness(settings, ScriptedBrowser::idle());
    harness
        .session
        .credentials()
        .set(AccessCredential::new("user-token", Vec::new()))
        .await;
    harness
}

pub fn playlist_reference() -> PlaylistReference {
    PlaylistReference {
        id: "pl-1".to_string(),
        uri: "spotify:playlist:pl-1".to_string(),
        name: "Road Trip".to_string(),
    }
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token",
            "token_type": "Bearer",
            "scope": "playlist-modify-private user-read-private",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_profile(server: &MockServer, product: &str) {
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "owner-1",
            "display_name": "Owner",
            "product": product
        })))
        .mount(server)
        .await;
}
