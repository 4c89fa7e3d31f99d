//! Library synchronization.
//!
//! Pulls each account's profile and library from the platform, reconciles
//! ownership and playtime with what is stored, grants pinned titles, and
//! fills in metadata for titles that have none yet.
//!
//! External failures never abort with an error: the profile refresh and
//! metadata lookups degrade silently, and a failed library fetch ends the
//! run early with [`SyncStatus::LibraryUnavailable`]. Only malformed input
//! and storage failures are returned as `Err`.
//!
//! # Example
//!
//! ```ignore
//! use family_shelf::sync::SyncEngine;
//!
//! let engine = SyncEngine::from_config(pool, &config)?;
//! let report = engine.synchronize("76561198000000001").await?;
//! println!("{report}");
//! ```

mod diff;
mod engine;
mod locks;
mod pinned;
mod report;

pub use diff::LibraryDiff;
pub use engine::{AccountSync, SyncEngine, DEFAULT_METADATA_CONCURRENCY};
pub use locks::{AccountGuard, AccountLocks};
pub use pinned::{PinnedTitle, PinnedTitles};
pub use report::{SyncReport, SyncStatus};
