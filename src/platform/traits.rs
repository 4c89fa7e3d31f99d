//! Trait definitions for the platform client.
//!
//! The sync engine depends on [`PlatformApi`] rather than the concrete
//! [`SteamClient`](super::SteamClient), so tests can substitute the mock
//! below.

use async_trait::async_trait;

use super::domain::{OwnedTitle, PlatformError, PlayerProfile};
use crate::model::SteamId;

/// Profile and library lookups for one platform account.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Fetch the account's public profile.
    async fn fetch_profile(&self, steam_id: &SteamId) -> Result<Option<PlayerProfile>, PlatformError>;

    /// Fetch the account's full library with lifetime playtime.
    async fn fetch_owned_titles(&self, steam_id: &SteamId) -> Result<Vec<OwnedTitle>, PlatformError>;
}

#[async_trait]
impl PlatformApi for super::SteamClient {
    async fn fetch_profile(&self, steam_id: &SteamId) -> Result<Option<PlayerProfile>, PlatformError> {
        self.fetch_profile(steam_id.as_str()).await
    }

    async fn fetch_owned_titles(&self, steam_id: &SteamId) -> Result<Vec<OwnedTitle>, PlatformError> {
        self.fetch_owned_titles(steam_id.as_str()).await
    }
}
