use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Settings,
    info,
    management::{CredentialStore, PlaylistSlot},
    spotify::{
        MusicService, SpotifyClient,
        auth::{Authorizer, Browser, SystemBrowser},
    },
};

/// Receives optional progress remarks meant to be spoken or shown to the user.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn say(&self, text: &str);
}

/// [`Narrator`] that writes remarks to the console log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNarrator;

#[async_trait]
impl Narrator for ConsoleNarrator {
    async fn say(&self, text: &str) {
        info!("{}", text);
    }
}

/// Everything one conversation needs across entry point calls.
///
/// Owns the credential cache, the current playlist slot and the collaborators
/// (remote service, browser, narrator). One instance is created per hosting
/// process, or per user if several independent sessions are ever needed.
pub struct Session {
    settings: Settings,
    authorizer: Authorizer,
    playlist: PlaylistSlot,
    service: Arc<dyn MusicService>,
    browser: Arc<dyn Browser>,
    narrator: Arc<dyn Narrator>,
}

impl Session {
    /// Creates a session talking to Spotify, the system browser and the console.
    pub fn new(settings: Settings) -> Self {
        let http = Client::new();
        let service = Arc::new(SpotifyClient::with_client(
            http.clone(),
            settings.api_url.clone(),
        ));
        Self::with_parts(
            settings,
            http,
            service,
            Arc::new(SystemBrowser),
            Arc::new(ConsoleNarrator),
        )
    }

    /// Creates a session from explicit collaborators.
    pub fn with_parts(
        settings: Settings,
        http: Client,
        service: Arc<dyn MusicService>,
        browser: Arc<dyn Browser>,
        narrator: Arc<dyn Narrator>,
    ) -> Self {
        let authorizer = Authorizer::new(
            settings.clone(),
            http,
            CredentialStore::new(),
            Arc::clone(&browser),
        );
        Self {
            settings,
            authorizer,
            playlist: PlaylistSlot::new(),
            service,
            browser,
            narrator,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.authorizer.store()
    }

    pub fn playlist(&self) -> &PlaylistSlot {
        &self.playlist
    }

    pub fn service(&self) -> Arc<dyn MusicService> {
        Arc::clone(&self.service)
    }

    pub fn browser(&self) -> &dyn Browser {
        self.browser.as_ref()
    }

    pub fn narrator(&self) -> &dyn Narrator {
        self.narrator.as_ref()
    }
}
