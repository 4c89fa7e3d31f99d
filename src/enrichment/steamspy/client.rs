//! SteamSpy HTTP client
//!
//! Community tag votes per app. No API key required.

use std::time::Duration;

use super::{adapter, dto};
use crate::enrichment::domain::EnrichmentError;
use crate::model::AppId;

/// SteamSpy client
pub struct SteamSpyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SteamSpyClient {
    /// Create a new client
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url("https://steamspy.com", timeout)
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: crate::enrichment::http_client(timeout),
            base_url: base_url.into(),
        }
    }

    /// Fetch up to ten tags for an app, most voted first
    pub async fn ranked_tags(&self, app_id: AppId) -> Result<Vec<String>, EnrichmentError> {
        let url = format!("{}/api.php?request=appdetails&appid={}", self.base_url, app_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(EnrichmentError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::from_status(status));
        }

        let details = response
            .json::<dto::AppDetails>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        Ok(adapter::to_ranked_tags(details))
    }
}
