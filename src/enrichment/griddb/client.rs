//! SteamGridDB HTTP client
//!
//! Fetches community-curated vertical cover art by Steam app id.
//! Requires a bearer API key; without one every lookup reports
//! [`EnrichmentError::Disabled`].

use std::time::Duration;

use super::dto;
use crate::enrichment::domain::{CoverVariant, EnrichmentError};
use crate::model::AppId;

/// SteamGridDB client
pub struct GridDbClient {
    api_key: Option<String>,
    http_client: reqwest::Client,
    base_url: String,
}

impl GridDbClient {
    /// Create a new client; `None` disables curated covers
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self::with_base_url(api_key, "https://www.steamgriddb.com/api/v2", timeout)
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            http_client: crate::enrichment::http_client(timeout),
            base_url: base_url.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// URL of the top-ranked 600x900 grid of the given variant
    pub async fn cover(&self, app_id: AppId, variant: CoverVariant) -> Result<String, EnrichmentError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(EnrichmentError::Disabled);
        };

        let url = format!(
            "{}/grids/steam/{}?types={}&dimensions=600x900",
            self.base_url,
            app_id,
            variant.as_str()
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(EnrichmentError::from_reqwest)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound(app_id));
        }
        if !status.is_success() {
            return Err(EnrichmentError::from_status(status));
        }

        let grids = response
            .json::<dto::GridsResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        grids
            .data
            .into_iter()
            .find(|g| !g.nsfw && !g.url.is_empty())
            .map(|g| g.url)
            .ok_or(EnrichmentError::NotFound(app_id))
    }
}
