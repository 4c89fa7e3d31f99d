//! Internal domain models for title enrichment.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use crate::model::AppId;

/// Descriptive metadata from the platform store page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Comma-joined genre list
    pub genres: Option<String>,
    pub release_year: Option<i32>,
    /// Horizontal store image, the last-resort cover
    pub fallback_cover: Option<String>,
}

/// Curated cover art shapes, in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverVariant {
    /// Tall 2:3 art, rare but preferred
    Portrait,
    /// Poster-style vertical art
    Poster,
}

impl CoverVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Poster => "poster",
        }
    }
}

/// Every cover source for one title, highest priority first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverCandidates {
    pub portrait: Option<String>,
    pub poster: Option<String>,
    /// The platform's own vertical library image
    pub platform: Option<String>,
    /// Horizontal store capsule
    pub store: Option<String>,
}

impl CoverCandidates {
    /// First available cover in priority order.
    pub fn select(self) -> Option<String> {
        [self.portrait, self.poster, self.platform, self.store]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
    }
}

/// Merged metadata ready to be written for a title
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub genres: Option<String>,
    pub release_year: Option<i32>,
    /// Ranked tags, most popular first
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
}

impl TitleMetadata {
    /// Combine the independent lookups for a title.
    pub fn assemble(store: Option<StoreMetadata>, tags: Vec<String>, covers: CoverCandidates) -> Self {
        let store = store.unwrap_or_default();
        Self {
            name: store.name,
            description: store.description,
            genres: store.genres,
            release_year: store.release_year,
            tags,
            cover_url: covers.select(),
        }
    }
}

/// Errors that can occur during a single enrichment lookup
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Http(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No data for app {0}")]
    NotFound(AppId),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Service not configured")]
    Disabled,
}

impl EnrichmentError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.to_string())
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else {
            Self::Http(status.as_u16())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_candidates() -> CoverCandidates {
        CoverCandidates {
            portrait: Some("A".to_string()),
            poster: Some("B".to_string()),
            platform: Some("C".to_string()),
            store: Some("D".to_string()),
        }
    }

    #[test]
    fn test_cover_priority_order() {
        assert_eq!(all_candidates().select().as_deref(), Some("A"));

        let no_portrait = CoverCandidates {
            portrait: None,
            ..all_candidates()
        };
        assert_eq!(no_portrait.select().as_deref(), Some("B"));

        let platform_only = CoverCandidates {
            portrait: None,
            poster: None,
            ..all_candidates()
        };
        assert_eq!(platform_only.select().as_deref(), Some("C"));

        let store_only = CoverCandidates {
            store: Some("D".to_string()),
            ..Default::default()
        };
        assert_eq!(store_only.select().as_deref(), Some("D"));

        assert_eq!(CoverCandidates::default().select(), None);
    }

    #[test]
    fn test_blank_cover_is_skipped() {
        let candidates = CoverCandidates {
            portrait: Some("  ".to_string()),
            poster: Some("B".to_string()),
            ..Default::default()
        };
        assert_eq!(candidates.select().as_deref(), Some("B"));
    }

    #[test]
    fn test_assemble_without_store() {
        let meta = TitleMetadata::assemble(
            None,
            vec!["Puzzle".to_string()],
            CoverCandidates {
                platform: Some("C".to_string()),
                ..Default::default()
            },
        );
        assert!(meta.name.is_none());
        assert_eq!(meta.tags, vec!["Puzzle"]);
        assert_eq!(meta.cover_url.as_deref(), Some("C"));
    }
}
