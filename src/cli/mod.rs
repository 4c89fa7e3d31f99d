//! Command-line interface for family-shelf.
//!
//! Every operation the library exposes (syncing, registering members,
//! ratings, covers, and statistics) is reachable from here.

mod commands;

pub use commands::{Cli, run_command};
