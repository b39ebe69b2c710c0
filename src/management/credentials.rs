use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::AccessCredential;

/// Process-scoped cache for the bearer credential.
///
/// Written once by the authorization coordinator, read by every remote call
/// afterwards. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credential: Arc<RwLock<Option<AccessCredential>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<AccessCredential> {
        self.credential.read().await.clone()
    }

    pub async fn set(&self, credential: AccessCredential) {
        *self.credential.write().await = Some(credential);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credential.read().await.is_some()
    }
}
