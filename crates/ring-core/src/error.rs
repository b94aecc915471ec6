//! Error types for ring construction, placement records and ring installation.

use crate::peer::PeerId;
use crate::ring::RingKind;

/// Result type alias for the ring libraries.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, decoding or installing a ring.
///
/// Validation errors are always raised before anything is written, so a
/// failed ring change leaves the installed ring untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Wrong number of peers for the requested kind.
    #[error("{kind} ring cannot be built from {count} peer(s)")]
    InvalidPeerCount { kind: RingKind, count: usize },

    /// Replication factor is zero or exceeds the peer count.
    #[error("{kind} ring cannot use replication factor {factor} with {peers} peer(s)")]
    InvalidReplicationFactor {
        kind: RingKind,
        factor: usize,
        peers: usize,
    },

    /// Kind name or wire tag is not one of empty, single, mod, ketama.
    #[error("unknown ring kind {0:?} (try \"empty\", \"single\", \"mod\" or \"ketama\")")]
    UnknownRingKind(String),

    /// A concurrent install already advanced the ring version.
    #[error("version conflict: current ring is v{current}, candidate is v{candidate}")]
    VersionConflict { current: u64, candidate: u64 },

    /// The installed ring is at the largest representable version.
    #[error("ring version space exhausted at v{current}")]
    VersionExhausted { current: u64 },

    /// The metadata service could not be read or written.
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// The same peer UUID appeared twice.
    #[error("duplicate peer {0}")]
    DuplicatePeer(PeerId),

    /// A requested peer UUID is not in the peer directory.
    #[error("unknown peer {0}")]
    UnknownPeer(PeerId),

    /// A persisted ring record could not be encoded or decoded.
    #[error("ring record codec error: {0}")]
    Codec(String),
}

impl Error {
    /// True if re-reading the current ring and rebuilding may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::VersionConflict { .. })
    }
}
