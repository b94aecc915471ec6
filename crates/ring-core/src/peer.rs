//! Peers and the peer directory.
//!
//! Peers are the cluster members a ring places partitions on. They are
//! identified by an opaque UUID string; everything else about a peer is
//! informational and never influences placement.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque unique identifier of a peer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(uuid: impl Into<String>) -> Self {
        PeerId(uuid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        PeerId(s.to_string())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        PeerId(s)
    }
}

impl AsRef<[u8]> for PeerId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A cluster member capable of holding data.
///
/// Immutable once observed; the authoritative copy lives in the metadata
/// service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub id: PeerId,
    /// Network location, e.g. `10.0.0.7:40000`. Empty for placeholders.
    pub address: String,
    /// Free-form attributes (capacity, zone, ...).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Set only by [`Peer::placeholder`]; never persisted.
    #[serde(skip)]
    placeholder: bool,
}

impl Peer {
    pub fn new(id: impl Into<PeerId>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            metadata: BTreeMap::new(),
            placeholder: false,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stand-in for a peer referenced by a historical ring but no longer
    /// present in the directory.
    pub fn placeholder(id: PeerId) -> Self {
        Self {
            id,
            address: String::new(),
            metadata: BTreeMap::new(),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// Which peers a ring change should use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerSelection {
    /// Every peer known to the directory.
    All,
    /// An explicit set of UUIDs.
    Uuids(Vec<PeerId>),
}

/// Ordered snapshot of the known peers, keyed uniquely by UUID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Peer>", into = "Vec<Peer>")]
pub struct PeerDirectory {
    peers: Vec<Peer>,
}

impl PeerDirectory {
    /// Build a directory, rejecting duplicate UUIDs.
    pub fn new(peers: Vec<Peer>) -> Result<Self> {
        ensure_unique(peers.iter().map(|p| &p.id))?;
        Ok(Self { peers })
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    pub fn get(&self, id: &PeerId) -> Option<&Peer> {
        self.peers.iter().find(|p| &p.id == id)
    }

    /// UUIDs of every known peer, in directory order.
    pub fn uuids(&self) -> Vec<PeerId> {
        self.peers.iter().map(|p| p.id.clone()).collect()
    }

    /// Return a copy with `peer` appended, or replacing the entry with the
    /// same UUID.
    pub fn with_peer(&self, peer: Peer) -> Self {
        let mut peers = self.peers.clone();
        match peers.iter_mut().find(|p| p.id == peer.id) {
            Some(existing) => *existing = peer,
            None => peers.push(peer),
        }
        Self { peers }
    }

    /// Resolve a selection to peers, in directory order.
    ///
    /// Explicit UUIDs must all be known and must not repeat.
    pub fn select(&self, selection: &PeerSelection) -> Result<Vec<Peer>> {
        match selection {
            PeerSelection::All => Ok(self.peers.clone()),
            PeerSelection::Uuids(ids) => {
                ensure_unique(ids.iter())?;
                if let Some(missing) = ids.iter().find(|id| self.get(id).is_none()) {
                    return Err(Error::UnknownPeer(missing.clone()));
                }
                Ok(self
                    .peers
                    .iter()
                    .filter(|p| ids.contains(&p.id))
                    .cloned()
                    .collect())
            }
        }
    }

    /// Resolve UUID references, substituting placeholders for peers that have
    /// left the directory. Order follows `ids`.
    pub fn resolve(&self, ids: &[PeerId]) -> Vec<Peer> {
        ids.iter()
            .map(|id| {
                self.get(id)
                    .cloned()
                    .unwrap_or_else(|| Peer::placeholder(id.clone()))
            })
            .collect()
    }
}

impl TryFrom<Vec<Peer>> for PeerDirectory {
    type Error = Error;

    fn try_from(peers: Vec<Peer>) -> Result<Self> {
        Self::new(peers)
    }
}

impl From<PeerDirectory> for Vec<Peer> {
    fn from(dir: PeerDirectory) -> Self {
        dir.peers
    }
}

pub(crate) fn ensure_unique<'a>(ids: impl Iterator<Item = &'a PeerId>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::DuplicatePeer(id.clone()));
        }
    }
    Ok(())
}
