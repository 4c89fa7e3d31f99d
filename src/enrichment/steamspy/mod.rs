//! SteamSpy integration
//!
//! Supplies the ranked community tag list for a title.

pub mod dto;
mod adapter;
mod client;

pub use adapter::MAX_TAGS;
pub use client::SteamSpyClient;
