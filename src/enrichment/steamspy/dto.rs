//! SteamSpy API Data Transfer Objects
//!
//! API Reference: https://steamspy.com/api.php
//!
//! `tags` is an object of tag -> vote count, but SteamSpy sends an empty
//! array instead when an app has no tags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `api.php?request=appdetails` response (only the fields we read)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppDetails {
    pub appid: Option<i64>,
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Tags {
    Votes(HashMap<String, u64>),
    Empty(Vec<serde_json::Value>),
}

impl Default for Tags {
    fn default() -> Self {
        Self::Empty(Vec::new())
    }
}
