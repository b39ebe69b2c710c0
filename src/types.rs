use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessCredential {
    pub access_token: String,
    pub scopes: Vec<String>,
    pub obtained_at: i64,
}

impl AccessCredential {
    pub fn new(access_token: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            access_token: access_token.into(),
            scopes,
            obtained_at: Utc::now().timestamp(),
        }
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_token", &"<redacted>")
            .field("scopes", &self.scopes)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

impl SubscriptionTier {
    pub fn from_product(product: Option<&str>) -> Self {
        match product {
            Some("premium") => SubscriptionTier::Premium,
            _ => SubscriptionTier::Free,
        }
    }

    pub fn is_premium(&self) -> bool {
        *self == SubscriptionTier::Premium
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: Option<String>,
    pub product: Option<String>,
}

impl Profile {
    pub fn tier(&self) -> SubscriptionTier {
        SubscriptionTier::from_product(self.product.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackResolution {
    Resolved(String),
    Unresolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistReference {
    pub id: String,
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<DeviceObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceObject {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackDevice {
    pub id: String,
    pub name: String,
    pub kind: Option<String>,
    pub is_active: bool,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    pub kind: String,
    pub active: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPlaybackRequest {
    pub context_uri: String,
}
