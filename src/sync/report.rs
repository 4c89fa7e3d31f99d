//! Outcome of one sync run.

use std::fmt;

use crate::model::SteamId;

/// How far a run got
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Every step ran
    Complete,
    /// The library could not be fetched; only the profile refresh and
    /// pinned titles were applied
    LibraryUnavailable { reason: String },
}

/// Counters collected while a run progresses
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub steam_id: SteamId,
    pub status: SyncStatus,
    /// The stored display name and avatar were refreshed
    pub profile_updated: bool,
    /// Pinned titles newly granted to the account
    pub pinned_added: usize,
    /// Titles in the fetched library (excluding pinned ids)
    pub titles_seen: usize,
    pub titles_added: usize,
    pub titles_removed: usize,
    /// Titles whose metadata was fetched and written
    pub titles_enriched: usize,
    /// Titles left to a concurrent run that was already enriching them
    pub enrichment_deferred: usize,
}

impl SyncReport {
    pub fn new(steam_id: SteamId) -> Self {
        Self {
            steam_id,
            status: SyncStatus::Complete,
            profile_updated: false,
            pinned_added: 0,
            titles_seen: 0,
            titles_added: 0,
            titles_removed: 0,
            titles_enriched: 0,
            enrichment_deferred: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SyncStatus::Complete
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            SyncStatus::Complete => write!(
                f,
                "{}: {} titles ({} added, {} removed), {} enriched",
                self.steam_id,
                self.titles_seen,
                self.titles_added,
                self.titles_removed,
                self.titles_enriched
            ),
            SyncStatus::LibraryUnavailable { reason } => {
                write!(f, "{}: library unavailable ({})", self.steam_id, reason)
            }
        }
    }
}
