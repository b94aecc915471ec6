//! Global flags and logging setup.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ring_store::{FileMetadata, RingStore, StoreConfig};
use tracing::Level;

use crate::commands::{Command, CommandResult};

/// Manage the placement ring of a cluster (ADVANCED).
#[derive(Debug, Parser)]
#[command(name = "ringctl", version, about)]
pub struct CliConfig {
    /// Metadata file holding the peer directory and ring history.
    #[arg(long, global = true, default_value = "ring-metadata.json")]
    pub metadata: PathBuf,

    /// Timeout for each metadata read or write, in milliseconds.
    #[arg(long, global = true, default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Install a stderr fmt subscriber at [`log_level`](Self::log_level).
    pub fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::with_timeout(Duration::from_millis(self.timeout_ms))
    }

    pub fn metadata(&self) -> Arc<FileMetadata> {
        Arc::new(FileMetadata::new(&self.metadata))
    }

    pub fn ring_store(&self) -> RingStore {
        RingStore::new(self.metadata(), self.store_config())
    }

    pub async fn run(&self) -> CommandResult {
        self.command.run(self).await
    }
}
