use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::PlaylistReference;

/// The "current playlist" slot; each successful creation overwrites it.
#[derive(Debug, Clone, Default)]
pub struct PlaylistSlot {
    current: Arc<RwLock<Option<PlaylistReference>>>,
}

impl PlaylistSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<PlaylistReference> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, playlist: PlaylistReference) -> Option<PlaylistReference> {
        self.current.write().await.replace(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str) -> PlaylistReference {
        PlaylistReference {
            id: id.to_string(),
            uri: format!("spotify:playlist:{id}"),
            name: format!("Playlist {id}"),
        }
    }

    #[tokio::test]
    async fn replace_overwrites_previous_playlist() {
        let slot = PlaylistSlot::new();
        assert!(slot.get().await.is_none());

        assert!(slot.replace(reference("one")).await.is_none());
        let previous = slot.replace(reference("two")).await;

        assert_eq!(previous, Some(reference("one")));
        assert_eq!(slot.get().await, Some(reference("two")));
    }
}
