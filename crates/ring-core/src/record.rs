//! Persisted ring records.
//!
//! A record references peers by UUID only, so a historical ring stays
//! interpretable after the peer directory changes: resolving it against any
//! directory yields the same placement, with placeholders for departed peers.
//!
//! Wire layout (bincode, fixed-int little-endian):
//!
//! ```text
//! format: u32 | kind: u32 | version: u64 | replication_factor: u32 | peers: Vec<String>
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::peer::{PeerDirectory, PeerId};
use crate::ring::builder::assemble;
use crate::ring::{Ring, RingDescriptor, RingKind};

/// Current record layout.
pub const RECORD_FORMAT: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingRecord {
    pub format: u32,
    /// [`RingKind::tag`].
    pub kind: u32,
    pub version: u64,
    pub replication_factor: u32,
    pub peers: Vec<PeerId>,
}

impl RingRecord {
    /// The empty ring at version 0 every fresh cluster starts from.
    pub fn genesis() -> Self {
        Self {
            format: RECORD_FORMAT,
            kind: RingKind::Empty.tag(),
            version: 0,
            replication_factor: 0,
            peers: Vec::new(),
        }
    }

    pub fn from_descriptor(desc: &RingDescriptor) -> Self {
        Self {
            format: RECORD_FORMAT,
            kind: desc.kind().tag(),
            version: desc.version(),
            replication_factor: desc.replication_factor() as u32,
            peers: desc.peer_ids(),
        }
    }

    pub fn ring_kind(&self) -> Result<RingKind> {
        RingKind::from_tag(self.kind)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Codec(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let record: RingRecord =
            bincode::deserialize(bytes).map_err(|e| Error::Codec(e.to_string()))?;
        record.check_format()?;
        Ok(record)
    }

    pub fn check_format(&self) -> Result<()> {
        if self.format != RECORD_FORMAT {
            return Err(Error::Codec(format!(
                "unsupported ring record format {} (expected {RECORD_FORMAT})",
                self.format
            )));
        }
        Ok(())
    }

    /// Rebuild the descriptor, resolving peer references against `directory`.
    pub fn resolve(&self, directory: &PeerDirectory) -> Result<RingDescriptor> {
        self.check_format()?;
        let kind = self.ring_kind()?;
        assemble(
            kind,
            directory.resolve(&self.peers),
            self.replication_factor as usize,
            self.version,
        )
    }

    pub fn to_ring(&self, directory: &PeerDirectory) -> Result<Ring> {
        self.resolve(directory).map(Ring::new)
    }
}
