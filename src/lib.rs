//! Family Shelf - a shared game library for one household.
//!
//! Tracks which family member owns which Steam titles and how long they
//! have played them, keeps descriptive metadata and cover art for every
//! title, and stores each member's personal ratings and notes.
//!
//! The core is [`sync::SyncEngine`], which reconciles the stored library
//! with the platform's view of each account.

pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod platform;
pub mod stats;
pub mod sync;
#[cfg(test)]
pub mod test_utils;
