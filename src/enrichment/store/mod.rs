//! Steam Store integration
//!
//! Descriptive metadata from the public `appdetails` endpoint.

pub mod dto;
mod adapter;
mod client;

pub use adapter::parse_release_year;
pub use client::StoreClient;
