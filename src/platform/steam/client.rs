//! Steam Web API HTTP client
//!
//! See: https://developer.valvesoftware.com/wiki/Steam_Web_API
//!
//! Both endpoints take the API key as a query parameter. Every request is
//! bounded by the configured timeout so a stalled Steam endpoint cannot
//! hold a sync run open.

use std::time::Duration;

use super::{adapter, dto};
use crate::platform::domain::{OwnedTitle, PlatformError, PlayerProfile};

const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Steam Web API client
pub struct SteamClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl SteamClient {
    /// Create a new client with the given API key and per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL (proxies, tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the public profile for a Steam id.
    ///
    /// `Ok(None)` means Steam answered but returned no such player.
    pub async fn fetch_profile(&self, steam_id: &str) -> Result<Option<PlayerProfile>, PlatformError> {
        let url = format!(
            "{}/ISteamUser/GetPlayerSummaries/v2/?key={}&steamids={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(steam_id)
        );
        let response: dto::PlayerSummariesResponse = self.get_json(&url).await?;
        Ok(adapter::to_profile(response, steam_id))
    }

    /// Fetch every title in the account's library, free games included.
    pub async fn fetch_owned_titles(&self, steam_id: &str) -> Result<Vec<OwnedTitle>, PlatformError> {
        let url = self.owned_games_url(steam_id);
        let response: dto::OwnedGamesResponse = self.get_json(&url).await?;
        adapter::to_owned_titles(response)
    }

    fn owned_games_url(&self, steam_id: &str) -> String {
        format!(
            "{}/IPlayerService/GetOwnedGames/v1/?key={}&steamid={}\
             &include_appinfo=1&include_played_free_games=1\
             &include_free_sub=1&include_unvetted_apps=1",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(steam_id)
        )
    }

    /// Send a GET request and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, PlatformError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(PlatformError::from_reqwest)?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(PlatformError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlatformError::RateLimited);
        }

        if !status.is_success() {
            return Err(PlatformError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{http_stub, silent_stub};

    const STEAM_ID: &str = "76561197960435530";

    fn client_for(base_url: String) -> SteamClient {
        SteamClient::with_base_url("key", base_url, Duration::from_secs(2))
    }

    #[test]
    fn test_client_creation() {
        let client = SteamClient::new("test-key", Duration::from_secs(4));
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, "https://api.steampowered.com");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client =
            SteamClient::with_base_url("key", "http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_owned_games_url_includes_free_titles() {
        let client = SteamClient::new("k&y", Duration::from_secs(4));
        let url = client.owned_games_url("76561197960435530");
        assert!(url.starts_with("https://api.steampowered.com/IPlayerService/GetOwnedGames/v1/"));
        assert!(url.contains("key=k%26y"));
        assert!(url.contains("steamid=76561197960435530"));
        assert!(url.contains("include_played_free_games=1"));
        assert!(url.contains("include_unvetted_apps=1"));
    }

    #[tokio::test]
    async fn test_server_error_is_not_an_empty_library() {
        let client = client_for(http_stub(500, "").await);
        let result = client.fetch_owned_titles(STEAM_ID).await;
        assert!(
            matches!(result, Err(PlatformError::Http { status: 500, .. })),
            "got {:?}",
            result
        );
    }

    #[tokio::test]
    async fn test_rejected_key_is_unauthorized() {
        let client = client_for(http_stub(401, "").await);
        let result = client.fetch_owned_titles(STEAM_ID).await;
        assert!(matches!(result, Err(PlatformError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported() {
        let client = client_for(http_stub(429, "").await);
        let result = client.fetch_profile(STEAM_ID).await;
        assert!(matches!(result, Err(PlatformError::RateLimited)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let client = client_for(http_stub(200, "{not json").await);
        let result = client.fetch_owned_titles(STEAM_ID).await;
        assert!(matches!(result, Err(PlatformError::Parse(_))));
    }

    #[tokio::test]
    async fn test_private_library_over_http() {
        let client = client_for(http_stub(200, r#"{"response":{}}"#).await);
        let result = client.fetch_owned_titles(STEAM_ID).await;
        assert!(matches!(result, Err(PlatformError::LibraryHidden(_))));
    }

    #[tokio::test]
    async fn test_empty_library_over_http() {
        let client = client_for(http_stub(200, r#"{"response":{"game_count":0}}"#).await);
        let titles = client.fetch_owned_titles(STEAM_ID).await.unwrap();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn test_library_over_http() {
        let body = r#"{"response":{"game_count":1,"games":[
            {"appid":620,"name":"Portal 2","playtime_forever":120}
        ]}}"#;
        let client = client_for(http_stub(200, body).await);
        let titles = client.fetch_owned_titles(STEAM_ID).await.unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].app_id, 620);
        assert_eq!(titles[0].hours(), 2.0);
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let client = SteamClient::with_base_url("key", silent_stub().await, Duration::from_millis(200));
        let result = client.fetch_owned_titles(STEAM_ID).await;
        assert!(matches!(result, Err(PlatformError::Timeout)), "got {:?}", result);
    }
}
