//! Ring installation through a metadata service.
//!
//! This crate provides:
//! - The [`MetadataService`] boundary (read ring, read peers, compare-and-swap
//!   install, history)
//! - An in-memory service and a JSON-file-backed service
//! - [`RingStore`], the client that applies timeouts and runs a whole ring
//!   change as one transaction
//!
//! The current ring lives only in the metadata service. Nothing here caches
//! it; every change re-reads the installed version and installs at exactly
//! the next one.

pub mod change;
pub mod client;
pub mod config;
pub mod file;
pub mod memory;
pub mod service;

pub use change::RingChange;
pub use client::RingStore;
pub use config::StoreConfig;
pub use file::FileMetadata;
pub use memory::MemoryMetadata;
pub use service::MetadataService;
