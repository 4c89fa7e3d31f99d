//! Steam Store HTTP client
//!
//! Fetches name, description, genres, release date, and store images.
//! No API key required; the store rate limits aggressively, so callers
//! should keep concurrency low.

use std::time::Duration;

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichmentError, StoreMetadata};
use crate::model::AppId;

/// Steam Store client
pub struct StoreClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Create a new client
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url("https://store.steampowered.com", timeout)
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: crate::enrichment::http_client(timeout),
            base_url: base_url.into(),
        }
    }

    /// Look up store metadata for an app
    pub async fn app_details(&self, app_id: AppId) -> Result<StoreMetadata, EnrichmentError> {
        let url = format!(
            "{}/api/appdetails?appids={}&cc=us&l=en",
            self.base_url, app_id
        );

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

        // The store answers `null` for some delisted apps
        let details = response
            .json::<Option<dto::AppDetailsResponse>>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?
            .ok_or(EnrichmentError::NotFound(app_id))?;

        adapter::to_store_metadata(details, app_id).ok_or(EnrichmentError::NotFound(app_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::http_stub;

    #[test]
    fn test_client_creation() {
        let client = StoreClient::new(Duration::from_secs(4));
        assert_eq!(client.base_url, "https://store.steampowered.com");
    }

    #[tokio::test]
    async fn test_details_over_http() {
        let body = r#"{"620":{"success":true,"data":{
            "name":"Portal 2",
            "short_description":"Think with portals.",
            "genres":[{"id":"1","description":"Action"}],
            "release_date":{"coming_soon":false,"date":"18 Apr, 2011"},
            "header_image":"https://cdn/header.jpg"
        }}}"#;
        let client = StoreClient::with_base_url(http_stub(200, body).await, Duration::from_secs(2));

        let meta = client.app_details(620).await.unwrap();
        assert_eq!(meta.name.as_deref(), Some("Portal 2"));
        assert_eq!(meta.release_year, Some(2011));
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let client = StoreClient::with_base_url(http_stub(500, "").await, Duration::from_secs(2));
        let result = client.app_details(620).await;
        assert!(matches!(result, Err(EnrichmentError::Http(500))), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let client = StoreClient::with_base_url(http_stub(200, "{not json").await, Duration::from_secs(2));
        let result = client.app_details(620).await;
        assert!(matches!(result, Err(EnrichmentError::Parse(_))));
    }

    #[tokio::test]
    async fn test_null_body_is_not_found() {
        let client = StoreClient::with_base_url(http_stub(200, "null").await, Duration::from_secs(2));
        let result = client.app_details(620).await;
        assert!(matches!(result, Err(EnrichmentError::NotFound(620))));
    }
}
