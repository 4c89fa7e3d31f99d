//! Steam Store `appdetails` Data Transfer Objects
//!
//! The store API is undocumented; these shapes follow what
//! `https://store.steampowered.com/api/appdetails?appids=N` returns.
//! The top level is an object keyed by the requested app id as a string.
//!
//! Example response:
//! ```json
//! {
//!   "620": {
//!     "success": true,
//!     "data": {
//!       "name": "Portal 2",
//!       "short_description": "The \"Perpetual Testing Initiative\" ...",
//!       "header_image": "https://.../header.jpg",
//!       "genres": [{"id": "1", "description": "Action"}],
//!       "release_date": {"coming_soon": false, "date": "18 Apr, 2011"}
//!     }
//!   }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level response: app id string -> envelope
pub type AppDetailsResponse = HashMap<String, AppDetailsEnvelope>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppDetailsEnvelope {
    pub success: bool,
    pub data: Option<AppData>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppData {
    pub name: Option<String>,
    pub short_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub release_date: Option<ReleaseDate>,
    pub header_image: Option<String>,
    pub capsule_image: Option<String>,
    pub capsule_imagev5: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub coming_soon: bool,
    /// Free-form, locale dependent ("18 Apr, 2011", "Coming soon", "Q3 2025")
    pub date: Option<String>,
}
