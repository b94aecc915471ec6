//! The ring-change transaction.
//!
//! Read the installed version and the peer directory, select peers, build the
//! candidate at version + 1, install it. Every validation runs before the
//! install, so a rejected change never touches the installed ring.

use ring_core::{build, next_version, PeerSelection, Result, Ring, RingKind};
use tracing::debug;

use crate::client::RingStore;

/// An operator's request for a new ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingChange {
    pub kind: RingKind,
    pub peers: PeerSelection,
    /// Only meaningful for mod and ketama rings.
    pub replication_factor: usize,
}

impl RingChange {
    pub fn new(kind: RingKind, peers: PeerSelection, replication_factor: usize) -> Self {
        Self {
            kind,
            peers,
            replication_factor,
        }
    }

    /// Wipe placement: an empty ring.
    pub fn empty() -> Self {
        Self::new(RingKind::Empty, PeerSelection::All, 0)
    }
}

impl RingStore {
    /// Build and install the ring described by `change`.
    ///
    /// Returns the installed ring. On `VersionConflict` the caller should
    /// re-run the whole change; nothing is retried here.
    pub async fn change_ring(&self, change: &RingChange) -> Result<Ring> {
        let (current, directory) =
            tokio::try_join!(self.current_record(), self.peer_directory())?;
        let version = next_version(current.version)?;

        let peers = match change.kind {
            RingKind::Empty => Vec::new(),
            _ => directory.select(&change.peers)?,
        };
        debug!(
            kind = %change.kind,
            selected = peers.len(),
            known = directory.len(),
            current_version = current.version,
            "preparing ring change"
        );

        let candidate = build(
            change.kind,
            peers,
            change.replication_factor,
            version,
        )?;
        self.install_ring(&candidate).await?;
        Ok(Ring::new(candidate))
    }
}
