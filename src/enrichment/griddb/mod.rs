//! SteamGridDB integration
//!
//! Curated portrait and poster art keyed by Steam app id.

pub mod dto;
mod client;

pub use client::GridDbClient;
