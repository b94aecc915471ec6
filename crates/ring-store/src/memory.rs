//! In-memory metadata service.
//!
//! Holds the ring history and peer directory behind a mutex. Optional fixed
//! latency and an outage switch make it usable for timeout and failure tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use ring_core::{Error, Peer, PeerDirectory, Result, RingRecord};
use tracing::debug;

use crate::service::{check_successor, MetadataService};

struct Inner {
    /// Never empty: starts with the genesis ring.
    history: Vec<RingRecord>,
    peers: PeerDirectory,
}

pub struct MemoryMetadata {
    inner: Mutex<Inner>,
    available: AtomicBool,
    read_latency: Duration,
    write_latency: Duration,
}

impl MemoryMetadata {
    /// Empty directory, genesis ring at version 0.
    pub fn new() -> Self {
        Self::with_peers(PeerDirectory::default())
    }

    pub fn with_peers(peers: PeerDirectory) -> Self {
        Self {
            inner: Mutex::new(Inner {
                history: vec![RingRecord::genesis()],
                peers,
            }),
            available: AtomicBool::new(true),
            read_latency: Duration::ZERO,
            write_latency: Duration::ZERO,
        }
    }

    /// Delay every read by `latency`.
    pub fn read_latency(mut self, latency: Duration) -> Self {
        self.read_latency = latency;
        self
    }

    /// Delay every install by `latency`, before the compare-and-swap.
    pub fn write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = latency;
        self
    }

    /// Simulate the service becoming unreachable (or reachable again).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Add or replace a peer in the directory.
    pub fn register_peer(&self, peer: Peer) {
        let mut inner = self.inner.lock();
        inner.peers = inner.peers.with_peer(peer);
    }

    async fn enter(&self, latency: Duration) -> Result<()> {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(Error::MetadataUnavailable(
                "in-memory metadata service is offline".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataService for MemoryMetadata {
    async fn get_ring(&self) -> Result<RingRecord> {
        self.enter(self.read_latency).await?;
        let inner = self.inner.lock();
        Ok(inner.history.last().cloned().unwrap_or_else(RingRecord::genesis))
    }

    async fn get_peers(&self) -> Result<PeerDirectory> {
        self.enter(self.read_latency).await?;
        Ok(self.inner.lock().peers.clone())
    }

    async fn set_ring(&self, candidate: RingRecord) -> Result<()> {
        self.enter(self.write_latency).await?;
        // No await past this point: check and commit happen under one lock.
        let mut inner = self.inner.lock();
        let current = inner.history.last().cloned().unwrap_or_else(RingRecord::genesis);
        check_successor(&current, &candidate)?;
        debug!(version = candidate.version, "committed ring record");
        inner.history.push(candidate);
        Ok(())
    }

    async fn ring_history(&self) -> Result<Vec<RingRecord>> {
        self.enter(self.read_latency).await?;
        Ok(self.inner.lock().history.clone())
    }
}
