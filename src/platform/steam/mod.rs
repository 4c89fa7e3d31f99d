//! Steam Web API integration
//!
//! Player summaries and owned games. Requires a Steam Web API key.

pub mod dto;
mod adapter;
mod client;

pub use client::SteamClient;
