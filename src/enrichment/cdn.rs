//! Steam CDN cover URLs.
//!
//! Steam serves a 600x900 library image for nearly every app at a fixed
//! path, so this needs no network call and always yields a URL.

use crate::model::AppId;

const CDN_BASE: &str = "https://steamcdn-a.akamaihd.net/steam/apps";

/// Vertical library cover for an app.
pub fn library_cover_url(app_id: AppId) -> String {
    format!("{CDN_BASE}/{app_id}/library_600x900.jpg")
}
