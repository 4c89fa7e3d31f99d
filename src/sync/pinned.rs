//! Titles every account owns regardless of what the platform reports.
//!
//! Pinned titles live outside the platform's catalog (browser and mobile
//! games, other launchers) so they use a reserved id range starting at
//! 900001. They are inserted once and never pruned, updated, or enriched.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::AppId;

/// One pinned title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedTitle {
    pub id: AppId,
    pub name: String,
}

impl PinnedTitle {
    pub fn new(id: AppId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

const BUILTIN: &[(AppId, &str)] = &[
    (900001, "Honkai: Star Rail"),
    (900002, "Crystal of Atlan"),
    (900003, "Legends of Runeterra"),
    (900004, "Nikke: Goddess of Victory"),
    (900005, "Krunker FRVR"),
    (900006, "Minecraft"),
    (900007, "Bloxd.io"),
    (900008, "Fortnite"),
    (900009, "League of Legends"),
    (900010, "Prodigy"),
    (900011, "Zenless Zone Zero"),
    (900012, "Valorant"),
    (900013, "Fall Guys"),
    (900014, "Genshin Impact"),
    (900015, "AFK Journey"),
    (900016, "Roblox"),
    (900017, "2XKO"),
    (900018, "Teamfight Tactics"),
    (900019, "Osu!"),
    (900020, "Hearthstone"),
];

/// The set of pinned titles in effect for a sync engine
#[derive(Debug, Clone, Default)]
pub struct PinnedTitles {
    titles: Vec<PinnedTitle>,
    ids: HashSet<AppId>,
}

impl PinnedTitles {
    /// Build a set; later duplicates of an id are dropped.
    pub fn new(titles: impl IntoIterator<Item = PinnedTitle>) -> Self {
        let mut ids = HashSet::new();
        let titles = titles.into_iter().filter(|t| ids.insert(t.id)).collect();
        Self { titles, ids }
    }

    /// The built-in family list
    pub fn builtin() -> Self {
        Self::new(BUILTIN.iter().map(|&(id, name)| PinnedTitle::new(id, name)))
    }

    /// The configured list if present, otherwise the built-in one.
    pub fn from_config(config: &Config) -> Self {
        match &config.pinned {
            Some(list) => Self::new(list.iter().cloned()),
            None => Self::builtin(),
        }
    }

    pub fn contains(&self, id: AppId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &HashSet<AppId> {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinnedTitle> {
        self.titles.iter()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list() {
        let pinned = PinnedTitles::builtin();
        assert_eq!(pinned.len(), 20);
        assert!(pinned.contains(900001));
        assert!(pinned.contains(900020));
        assert!(!pinned.contains(440));
        assert_eq!(
            pinned.iter().find(|t| t.id == 900006).map(|t| t.name.as_str()),
            Some("Minecraft")
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let pinned = PinnedTitles::new(vec![
            PinnedTitle::new(1, "First"),
            PinnedTitle::new(1, "Second"),
            PinnedTitle::new(2, "Other"),
        ]);
        assert_eq!(pinned.len(), 2);
        assert_eq!(pinned.iter().next().map(|t| t.name.as_str()), Some("First"));
    }

    #[test]
    fn test_config_overrides_builtin() {
        let mut config = Config::default();
        assert_eq!(PinnedTitles::from_config(&config).len(), 20);

        config.pinned = Some(vec![PinnedTitle::new(900100, "Board Game Night")]);
        let pinned = PinnedTitles::from_config(&config);
        assert_eq!(pinned.len(), 1);
        assert!(pinned.contains(900100));

        config.pinned = Some(Vec::new());
        assert!(PinnedTitles::from_config(&config).is_empty());
    }
}
