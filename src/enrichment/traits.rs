//! Trait definition for the metadata source used by sync.
//!
//! The sync engine only sees [`MetadataApi`], so tests can substitute a
//! mock that counts lookups without any network access.
//!
//! Every method is infallible from the caller's point of view: failures
//! are logged by the implementation and surface as `None` or an empty list.

use async_trait::async_trait;

use super::domain::{CoverVariant, StoreMetadata};
use crate::model::AppId;

/// Degrading metadata lookups for a single title.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Store page details, or `None` when the store has nothing usable.
    async fn fetch_store_metadata(&self, app_id: AppId) -> Option<StoreMetadata>;

    /// Community tags, most voted first.
    async fn fetch_tags(&self, app_id: AppId) -> Vec<String>;

    /// Curated vertical art of one variant.
    async fn fetch_curated_cover(&self, app_id: AppId, variant: CoverVariant) -> Option<String>;

    /// A cover URL that exists for nearly every app; never fails.
    fn guaranteed_fallback_cover(&self, app_id: AppId) -> String {
        super::cdn::library_cover_url(app_id)
    }
}
