//! Immutable ring descriptors.

use crate::error::{Error, Result};
use crate::peer::{Peer, PeerId};
use crate::record::RingRecord;

use super::RingKind;

/// The version a ring installed after `current` must carry.
pub fn next_version(current: u64) -> Result<u64> {
    current
        .checked_add(1)
        .ok_or(Error::VersionExhausted { current })
}

/// Everything needed to reproduce a ring's placement: kind, ordered peers,
/// replication factor and version.
///
/// Only the ring builder creates descriptors, so a descriptor is always
/// valid for its kind. Changing anything means building a new descriptor at
/// the next version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingDescriptor {
    pub(super) kind: RingKind,
    pub(super) peers: Vec<Peer>,
    pub(super) replication_factor: usize,
    pub(super) version: u64,
}

impl RingDescriptor {
    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.iter().map(|p| p.id.clone()).collect()
    }

    /// 0 for empty rings, 1 for single rings.
    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The persisted form of this descriptor.
    pub fn to_record(&self) -> RingRecord {
        RingRecord::from_descriptor(self)
    }
}
