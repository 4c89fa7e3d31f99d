//! Adapter layer: Convert Steam Web API DTOs to domain models
//!
//! This is the ONLY place where Steam DTO types are converted to domain
//! types.

use super::dto;
use crate::platform::domain::{OwnedTitle, PlatformError, PlayerProfile};

/// Extract the requested player's profile, if Steam returned one.
pub fn to_profile(response: dto::PlayerSummariesResponse, steam_id: &str) -> Option<PlayerProfile> {
    let players = response.response.players;
    let player = players
        .iter()
        .find(|p| p.steamid == steam_id)
        .or_else(|| players.first())?;

    let display_name = player.personaname.clone().filter(|n| !n.is_empty())?;
    let avatar_url = player
        .avatarfull
        .clone()
        .or_else(|| player.avatar.clone())
        .filter(|a| !a.trim().is_empty());

    Some(PlayerProfile {
        display_name,
        avatar_url,
    })
}

/// Convert an owned-games response into the account's library.
///
/// A response carrying neither `games` nor `game_count` means Steam hid the
/// library (private profile) and is reported as an error; `game_count: 0`
/// is a genuinely empty library.
pub fn to_owned_titles(response: dto::OwnedGamesResponse) -> Result<Vec<OwnedTitle>, PlatformError> {
    let owned = response.response;
    match (owned.games, owned.game_count) {
        (Some(games), _) => Ok(games
            .into_iter()
            .map(|g| OwnedTitle {
                app_id: g.appid,
                playtime_minutes: g.playtime_forever,
                name: g.name.unwrap_or_default(),
            })
            .collect()),
        (None, Some(_)) => Ok(Vec::new()),
        (None, None) => Err(PlatformError::LibraryHidden(
            "no games or game_count in response (profile may be private)".to_string(),
        )),
    }
}
