//! Internal domain models for platform data.
//!
//! All Steam responses get converted into these types by the adapter.

use crate::model::AppId;

/// Public profile of a platform account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub display_name: String,
    /// `None` when the platform sent no avatar; the cached one is kept
    pub avatar_url: Option<String>,
}

/// One title in an account's platform library
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedTitle {
    pub app_id: AppId,
    /// Lifetime playtime as reported by the platform
    pub playtime_minutes: u64,
    /// Platform display name (may be empty for unvetted apps)
    pub name: String,
}

impl OwnedTitle {
    /// Cumulative hours, not rounded.
    pub fn hours(&self) -> f64 {
        self.playtime_minutes as f64 / 60.0
    }
}

/// Errors from the platform API
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("API key rejected")]
    Unauthorized,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The platform answered but withheld the library (private profile)
    #[error("Library unavailable: {0}")]
    LibraryHidden(String),
}

impl PlatformError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_are_fractional() {
        let title = OwnedTitle {
            app_id: 300,
            playtime_minutes: 30,
            name: "Half Hour".to_string(),
        };
        assert_eq!(title.hours(), 0.5);

        let long = OwnedTitle {
            playtime_minutes: 125,
            ..title
        };
        assert!((long.hours() - 2.083_333).abs() < 1e-5);
    }
}
