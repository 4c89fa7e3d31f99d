//! Core data models for the family library.
//!
//! Defines the primary entities: [`Account`], [`Title`], [`PlaytimeRecord`],
//! and [`UserGameEntry`], plus the validated [`SteamId`] newtype.
//! Row types derive SQLx's `FromRow` for database mapping.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `accounts` - Registered family members, one per Steam id
//! - `titles` - Global title metadata keyed by app id
//! - `owned_titles` - Which Steam account owns which title
//! - `playtime` - Cumulative hours per (Steam id, title)
//! - `user_game_entries` - Personal ratings and notes

use std::fmt;

use sqlx::FromRow;

use crate::error::{Error, Result};

/// Platform-assigned title identifier (Steam app id).
pub type AppId = i64;

/// Number of digits in a Steam 64-bit id.
pub const STEAM_ID_LEN: usize = 17;

/// A validated Steam 64-bit account identifier.
///
/// Always exactly [`STEAM_ID_LEN`] ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId(String);

impl SteamId {
    /// Parse and validate a raw Steam id, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != STEAM_ID_LEN {
            return Err(Error::validation(
                "steam id",
                format!(
                    "expected {} digits, got {} characters",
                    STEAM_ID_LEN,
                    trimmed.len()
                ),
            ));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::validation("steam id", "must contain only digits"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SteamId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A registered family member.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Login name (unique)
    pub username: String,
    /// Opaque credential hash, produced outside this crate
    pub credential_hash: String,
    /// Linked Steam id (unique, immutable)
    pub steamid: String,
    /// Display name from the last successful profile refresh
    pub display_name: Option<String>,
    /// Avatar URL from the last successful profile refresh
    pub avatar_url: Option<String>,
    pub is_admin: bool,
}

/// Global metadata for a title.
#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub appid: AppId,
    /// Canonical name
    pub title: Option<String>,
    /// Primary cover, written by synchronization
    pub cover_url: Option<String>,
    /// User-chosen cover, never written by synchronization
    pub custom_cover_url: Option<String>,
    pub description: Option<String>,
    /// Comma-joined genre list
    pub genres: Option<String>,
    pub release_year: Option<i64>,
    /// Comma-joined tag list, most popular first
    pub tags: Option<String>,
}

impl Title {
    /// The cover to display: the user override when set, else the primary.
    pub fn effective_cover(&self) -> Option<&str> {
        self.custom_cover_url
            .as_deref()
            .or(self.cover_url.as_deref())
    }

    /// Tags split back into a list.
    pub fn tag_list(&self) -> Vec<&str> {
        split_list(self.tags.as_deref())
    }

    /// Genres split back into a list.
    pub fn genre_list(&self) -> Vec<&str> {
        split_list(self.genres.as_deref())
    }
}

fn split_list(joined: Option<&str>) -> Vec<&str> {
    joined
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Cumulative playtime for one account and title.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PlaytimeRecord {
    pub steamid: String,
    pub appid: AppId,
    pub hours: f64,
    /// RFC 3339 timestamp of the sync that wrote this row
    pub last_synced: String,
}

/// A family member's personal rating and notes for a title.
#[derive(Debug, Clone, FromRow)]
pub struct UserGameEntry {
    pub id: i64,
    pub account_id: i64,
    pub appid: AppId,
    /// Rating in 1..=10
    pub rating: Option<i64>,
    pub notes: String,
    /// Manual position in the member's play queue
    pub play_order: Option<i64>,
    pub created_at: String,
}

/// Ordering for library and family listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Alphabetical by title
    #[default]
    Name,
    /// Most played first
    Hours,
    /// Highest rated first, unrated last
    Rating,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "alpha" | "title" => Ok(Self::Name),
            "hours" | "playtime" => Ok(Self::Hours),
            "rating" => Ok(Self::Rating),
            other => Err(format!(
                "unknown sort order '{other}' (expected name, hours, or rating)"
            )),
        }
    }
}
