//! Title enrichment module - fetches descriptive metadata and cover art from
//! external services.
//!
//! # Architecture
//!
//! This module follows the same separation as [`crate::platform`]:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`store/dto.rs`, `steamspy/dto.rs`, `griddb/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs
//! - **Service** - Degrades every lookup failure to "absent" and assembles
//!   the final [`TitleMetadata`]
//!
//! Each source is independent. A store outage still leaves tags and a
//! cover; a missing SteamGridDB key just skips curated art.
//!
//! # Usage
//!
//! ```ignore
//! use family_shelf::enrichment::{enrich_title, EnrichmentService};
//!
//! let service = EnrichmentService::from_config(&config);
//! let metadata = enrich_title(&service, 620).await;
//! println!("{:?} -> {:?}", metadata.name, metadata.cover_url);
//! ```

use std::time::Duration;

pub mod cdn;
pub mod domain;
pub mod griddb;
pub mod service;
pub mod steamspy;
pub mod store;
pub mod traits;

pub use domain::{CoverCandidates, CoverVariant, EnrichmentError, StoreMetadata, TitleMetadata};
pub use service::{enrich_title, EnrichmentService};
pub use traits::MetadataApi;

/// Shared HTTP client settings for every enrichment source.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .gzip(true)
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .expect("Failed to build HTTP client")
}
