//! Administrative CLI for cluster placement rings.
//!
//! Provides commands for:
//! - Listing and registering peers
//! - Inspecting the installed ring and its history
//! - Replacing the ring (empty, single, mod, ketama)
//! - Locating the peers responsible for a key

pub mod commands;
pub mod config;

pub use commands::{ChangeArgs, Command, CommandResult, PeerCommand, RingCommand};
pub use config::CliConfig;
