mod credentials;
mod playlist;

pub use credentials::CredentialStore;
pub use playlist::PlaylistSlot;
