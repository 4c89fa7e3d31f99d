//! Enrichment service - combines the store, tag, and cover sources
//!
//! For one title:
//! 1. Store details, ranked tags, and a curated portrait are fetched together
//! 2. A curated poster is only requested when no portrait exists
//! 3. The cover is chosen by priority: portrait, poster, CDN library image,
//!    store capsule
//!
//! Errors from any source are logged and treated as "nothing found".

use crate::config::Config;
use crate::enrichment::{
    domain::{CoverCandidates, CoverVariant, EnrichmentError, StoreMetadata, TitleMetadata},
    griddb::GridDbClient,
    steamspy::SteamSpyClient,
    store::StoreClient,
    traits::MetadataApi,
};
use crate::model::AppId;

/// Production metadata source backed by the public HTTP APIs
pub struct EnrichmentService {
    store: StoreClient,
    steamspy: SteamSpyClient,
    griddb: GridDbClient,
}

impl EnrichmentService {
    pub fn new(store: StoreClient, steamspy: SteamSpyClient, griddb: GridDbClient) -> Self {
        Self {
            store,
            steamspy,
            griddb,
        }
    }

    /// Build every client with the configured timeout and keys
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.http.timeout();
        Self::new(
            StoreClient::new(timeout),
            SteamSpyClient::new(timeout),
            GridDbClient::new(config.credentials.steamgriddb_api_key.clone(), timeout),
        )
    }

    /// Whether curated covers can be fetched
    pub fn curated_covers_enabled(&self) -> bool {
        self.griddb.is_enabled()
    }
}

/// Log a failed lookup at a level matching how surprising it is.
fn log_failure(source: &'static str, app_id: AppId, err: &EnrichmentError) {
    match err {
        EnrichmentError::NotFound(_) | EnrichmentError::Disabled => {
            tracing::debug!(target: "enrichment", source, app_id, "{}", err);
        }
        _ => {
            tracing::warn!(target: "enrichment", source, app_id, "Lookup failed: {}", err);
        }
    }
}

#[async_trait::async_trait]
impl MetadataApi for EnrichmentService {
    async fn fetch_store_metadata(&self, app_id: AppId) -> Option<StoreMetadata> {
        self.store
            .app_details(app_id)
            .await
            .map_err(|e| log_failure("store", app_id, &e))
            .ok()
    }

    async fn fetch_tags(&self, app_id: AppId) -> Vec<String> {
        self.steamspy
            .ranked_tags(app_id)
            .await
            .unwrap_or_else(|e| {
                log_failure("steamspy", app_id, &e);
                Vec::new()
            })
    }

    async fn fetch_curated_cover(&self, app_id: AppId, variant: CoverVariant) -> Option<String> {
        if !self.griddb.is_enabled() {
            return None;
        }
        self.griddb
            .cover(app_id, variant)
            .await
            .map_err(|e| log_failure("steamgriddb", app_id, &e))
            .ok()
    }
}

/// Fetch and assemble everything known about a title.
///
/// Never fails; the worst case is a bare CDN cover with no other fields.
pub async fn enrich_title(api: &dyn MetadataApi, app_id: AppId) -> TitleMetadata {
    let (store, tags, portrait) = tokio::join!(
        api.fetch_store_metadata(app_id),
        api.fetch_tags(app_id),
        api.fetch_curated_cover(app_id, CoverVariant::Portrait),
    );

    let poster = match portrait {
        Some(_) => None,
        None => api.fetch_curated_cover(app_id, CoverVariant::Poster).await,
    };

    let covers = CoverCandidates {
        portrait,
        poster,
        platform: Some(api.guaranteed_fallback_cover(app_id)),
        store: store.as_ref().and_then(|s| s.fallback_cover.clone()),
    };

    tracing::debug!(
        target: "enrichment",
        app_id,
        has_store = store.is_some(),
        tags = tags.len(),
        "Enriched title"
    );

    TitleMetadata::assemble(store, tags, covers)
}
