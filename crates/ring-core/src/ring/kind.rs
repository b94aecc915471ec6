//! Ring kinds and the table that dispatches on them.
//!
//! Every kind is described by one [`KindEntry`]: its name, its stable wire
//! tag, how it validates a peer set and replication factor, and how it
//! constructs its placement function. Adding a kind means adding a variant
//! and a table row.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::peer::Peer;

use super::ketama::KetamaPlacement;
use super::modulo::ModPlacement;
use super::placement::{EmptyPlacement, Placement, SinglePlacement};

/// The placement algorithm a ring uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingKind {
    /// No placement targets. Bootstraps or wipes a cluster.
    Empty,
    /// Every partition on one peer.
    Single,
    /// `hash(key) mod n`, replicas on the following peers.
    Mod,
    /// Consistent hashing over virtual points.
    Ketama,
}

type Validate = fn(RingKind, &[Peer], usize) -> Result<usize>;
type Construct = fn(&[Peer], usize) -> Arc<dyn Placement>;

pub(crate) struct KindEntry {
    pub kind: RingKind,
    pub name: &'static str,
    pub tag: u32,
    /// Checks the peer set and returns the effective replication factor.
    pub validate: Validate,
    pub construct: Construct,
}

static KINDS: [KindEntry; 4] = [
    KindEntry {
        kind: RingKind::Empty,
        name: "empty",
        tag: 0,
        validate: validate_empty,
        construct: construct_empty,
    },
    KindEntry {
        kind: RingKind::Single,
        name: "single",
        tag: 1,
        validate: validate_single,
        construct: construct_single,
    },
    KindEntry {
        kind: RingKind::Mod,
        name: "mod",
        tag: 2,
        validate: validate_replicated,
        construct: construct_mod,
    },
    KindEntry {
        kind: RingKind::Ketama,
        name: "ketama",
        tag: 3,
        validate: validate_replicated,
        construct: construct_ketama,
    },
];

fn validate_empty(_kind: RingKind, _peers: &[Peer], _rf: usize) -> Result<usize> {
    Ok(0)
}

fn validate_single(kind: RingKind, peers: &[Peer], _rf: usize) -> Result<usize> {
    if peers.len() != 1 {
        return Err(Error::InvalidPeerCount {
            kind,
            count: peers.len(),
        });
    }
    Ok(1)
}

fn validate_replicated(kind: RingKind, peers: &[Peer], rf: usize) -> Result<usize> {
    if peers.is_empty() {
        return Err(Error::InvalidPeerCount { kind, count: 0 });
    }
    if rf == 0 || rf > peers.len() {
        return Err(Error::InvalidReplicationFactor {
            kind,
            factor: rf,
            peers: peers.len(),
        });
    }
    Ok(rf)
}

fn construct_empty(_peers: &[Peer], _rf: usize) -> Arc<dyn Placement> {
    Arc::new(EmptyPlacement)
}

fn construct_single(_peers: &[Peer], _rf: usize) -> Arc<dyn Placement> {
    Arc::new(SinglePlacement)
}

fn construct_mod(peers: &[Peer], rf: usize) -> Arc<dyn Placement> {
    Arc::new(ModPlacement::new(peers.len(), rf))
}

fn construct_ketama(peers: &[Peer], rf: usize) -> Arc<dyn Placement> {
    Arc::new(KetamaPlacement::new(peers, rf))
}

impl RingKind {
    pub const ALL: [RingKind; 4] = [
        RingKind::Empty,
        RingKind::Single,
        RingKind::Mod,
        RingKind::Ketama,
    ];

    pub(crate) fn entry(self) -> &'static KindEntry {
        // The table is indexed by declaration order.
        &KINDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Stable tag used in persisted ring records.
    pub fn tag(self) -> u32 {
        self.entry().tag
    }

    pub fn from_tag(tag: u32) -> Result<Self> {
        KINDS
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| e.kind)
            .ok_or_else(|| Error::UnknownRingKind(format!("tag {tag}")))
    }

    /// Whether peers can be added to or removed from a ring of this kind.
    pub fn is_resizable(self) -> bool {
        matches!(self, RingKind::Mod | RingKind::Ketama)
    }
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        KINDS
            .iter()
            .find(|e| e.name == wanted)
            .map(|e| e.kind)
            .ok_or_else(|| Error::UnknownRingKind(s.to_string()))
    }
}
