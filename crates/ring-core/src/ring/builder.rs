//! Ring construction.
//!
//! [`build`] is the single validating entry point; [`RingBuilder`] is a
//! fluent wrapper over it.

use tracing::debug;

use crate::error::Result;
use crate::peer::{ensure_unique, Peer};

use super::{Ring, RingDescriptor, RingKind};

/// Build a descriptor of `kind` over `peers` at `version`.
///
/// - empty: ignores `peers` and `replication_factor`.
/// - single: exactly one peer; replication factor is 1.
/// - mod / ketama: at least one peer, `1 <= replication_factor <= peers`.
///
/// Peers must have distinct UUIDs. Nothing is corrected silently: any
/// violation is returned as an error.
pub fn build(
    kind: RingKind,
    peers: Vec<Peer>,
    replication_factor: usize,
    version: u64,
) -> Result<RingDescriptor> {
    let desc = assemble(kind, peers, replication_factor, version)?;
    debug!(
        %kind,
        version,
        peers = desc.peers.len(),
        replication_factor = desc.replication_factor,
        "built ring descriptor"
    );
    metrics::counter!("ring_build_total", "kind" => kind.name()).increment(1);
    Ok(desc)
}

/// Validation shared by [`build`] and record resolution. Records are
/// re-validated on every read, which is not a new ring.
pub(crate) fn assemble(
    kind: RingKind,
    peers: Vec<Peer>,
    replication_factor: usize,
    version: u64,
) -> Result<RingDescriptor> {
    let entry = kind.entry();
    let peers = if kind == RingKind::Empty { Vec::new() } else { peers };

    ensure_unique(peers.iter().map(|p| &p.id))?;
    let replication_factor = (entry.validate)(kind, &peers, replication_factor)?;

    Ok(RingDescriptor {
        kind,
        peers,
        replication_factor,
        version,
    })
}

/// Fluent construction of a [`Ring`].
///
/// ```rust
/// use ring_core::{Peer, RingBuilder, RingKind};
///
/// let ring = RingBuilder::new(RingKind::Mod)
///     .add_peer(Peer::new("a", "10.0.0.1:4000"))
///     .add_peer(Peer::new("b", "10.0.0.2:4000"))
///     .replication_factor(2)
///     .version(1)
///     .build()
///     .unwrap();
/// assert_eq!(ring.locate(b"key1").len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder {
    kind: RingKind,
    peers: Vec<Peer>,
    replication_factor: usize,
    version: u64,
}

impl RingBuilder {
    pub fn new(kind: RingKind) -> Self {
        Self {
            kind,
            peers: Vec::new(),
            replication_factor: 1,
            version: 0,
        }
    }

    pub fn add_peer(mut self, peer: Peer) -> Self {
        self.peers.push(peer);
        self
    }

    pub fn peers(mut self, peers: impl IntoIterator<Item = Peer>) -> Self {
        self.peers.extend(peers);
        self
    }

    pub fn replication_factor(mut self, replication_factor: usize) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn build_descriptor(self) -> Result<RingDescriptor> {
        build(self.kind, self.peers, self.replication_factor, self.version)
    }

    pub fn build(self) -> Result<Ring> {
        self.build_descriptor().map(Ring::new)
    }
}
