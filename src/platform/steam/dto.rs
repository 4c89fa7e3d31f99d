//! Steam Web API Data Transfer Objects
//!
//! These types match what the Steam Web API returns.
//! DO NOT use these types outside the steam module - convert to domain types.
//!
//! API Reference: https://developer.valvesoftware.com/wiki/Steam_Web_API
//!
//! Example `GetOwnedGames` response:
//! ```json
//! {
//!   "response": {
//!     "game_count": 2,
//!     "games": [
//!       {"appid": 440, "name": "Team Fortress 2", "playtime_forever": 1234},
//!       {"appid": 620, "name": "Portal 2", "playtime_forever": 0}
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// `ISteamUser/GetPlayerSummaries/v2` envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSummariesResponse {
    pub response: PlayerSummaries,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerSummaries {
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSummary {
    pub steamid: String,
    pub personaname: Option<String>,
    /// 184x184 avatar
    pub avatarfull: Option<String>,
    /// 32x32 avatar, used when the full one is missing
    pub avatar: Option<String>,
}

/// `IPlayerService/GetOwnedGames/v1` envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OwnedGamesResponse {
    #[serde(default)]
    pub response: OwnedGames,
}

/// Private profiles come back as an empty object: neither field is set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OwnedGames {
    pub game_count: Option<u32>,
    pub games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OwnedGame {
    pub appid: i64,
    pub name: Option<String>,
    /// Lifetime minutes played
    #[serde(default)]
    pub playtime_forever: u64,
}
