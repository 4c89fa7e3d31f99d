//! Gaming platform integration - player profiles and owned libraries.
//!
//! # Architecture
//!
//! Mirrors the enrichment module layout:
//! - **Domain models** (`domain.rs`) - [`PlayerProfile`], [`OwnedTitle`]
//! - **API DTOs** (`steam/dto.rs`) - Exact Steam Web API response shapes
//! - **Adapter** (`steam/adapter.rs`) - DTO to domain conversion
//! - **Client** (`steam/client.rs`) - HTTP client
//! - **Traits** (`traits.rs`) - [`PlatformApi`] seam used by the sync engine
//!
//! A failed library fetch is reported as an error rather than an empty
//! list, so the sync engine never mistakes an outage for "owns nothing".

pub mod domain;
pub mod steam;
pub mod traits;

pub use domain::{OwnedTitle, PlatformError, PlayerProfile};
pub use steam::SteamClient;
pub use traits::PlatformApi;
