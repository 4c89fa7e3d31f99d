//! Adapter layer: Convert Steam Store DTOs to domain models

use super::dto;
use crate::enrichment::domain::StoreMetadata;

/// Convert an `appdetails` response for one app into store metadata.
///
/// Returns `None` when the store has no entry for the app.
pub fn to_store_metadata(mut response: dto::AppDetailsResponse, app_id: i64) -> Option<StoreMetadata> {
    let envelope = response.remove(&app_id.to_string())?;
    if !envelope.success {
        return None;
    }
    let data = envelope.data?;

    let genres = data
        .genres
        .iter()
        .map(|g| g.description.trim())
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    // Horizontal images, smallest-first the way the store lays them out
    let fallback_cover = [data.capsule_imagev5, data.capsule_image, data.header_image]
        .into_iter()
        .flatten()
        .find(|url| !url.is_empty());

    Some(StoreMetadata {
        name: data.name.filter(|n| !n.is_empty()),
        description: data.short_description.filter(|d| !d.trim().is_empty()),
        genres: (!genres.is_empty()).then_some(genres),
        release_year: data
            .release_date
            .and_then(|r| r.date)
            .and_then(|d| parse_release_year(&d)),
        fallback_cover,
    })
}

/// Pull a year from the store's free-form date: the trailing four digits.
pub fn parse_release_year(date: &str) -> Option<i32> {
    let trimmed = date.trim();
    let start = trimmed.len().checked_sub(4)?;
    let tail = trimmed.get(start..)?;
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}
