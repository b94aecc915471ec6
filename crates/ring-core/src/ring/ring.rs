//! The runtime ring: a descriptor plus its placement function.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::peer::{Peer, PeerId};
use crate::token::Token;

use super::builder::build;
use super::descriptor::next_version;
use super::placement::Placement;
use super::{RingDescriptor, RingKind};

/// An installed (or candidate) ring.
///
/// Cloning is cheap and every query is read-only, so a ring can be shared
/// across threads and queried concurrently without locking. For a fixed
/// descriptor, [`locate`](Ring::locate) is a pure function of the key.
#[derive(Clone)]
pub struct Ring {
    descriptor: Arc<RingDescriptor>,
    placement: Arc<dyn Placement>,
}

impl Ring {
    pub fn new(descriptor: RingDescriptor) -> Self {
        let entry = descriptor.kind.entry();
        let placement = (entry.construct)(&descriptor.peers, descriptor.replication_factor);
        Self {
            descriptor: Arc::new(descriptor),
            placement,
        }
    }

    /// Ordered peers responsible for `key`; the first is the primary.
    ///
    /// Returns `replication_factor` distinct peers for mod and ketama rings,
    /// the one peer for single rings, and nothing for empty rings.
    pub fn locate(&self, key: impl AsRef<[u8]>) -> Vec<&Peer> {
        let mut indices = Vec::with_capacity(self.descriptor.replication_factor);
        self.placement
            .locate(Token::for_key(key.as_ref()), &mut indices);
        indices
            .into_iter()
            .map(|i| &self.descriptor.peers[i])
            .collect()
    }

    /// Primary peer for `key`, if the ring has any.
    pub fn primary(&self, key: impl AsRef<[u8]>) -> Option<&Peer> {
        self.locate(key).into_iter().next()
    }

    pub fn descriptor(&self) -> &RingDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> RingKind {
        self.descriptor.kind
    }

    pub fn version(&self) -> u64 {
        self.descriptor.version
    }

    pub fn replication_factor(&self) -> usize {
        self.descriptor.replication_factor
    }

    /// Peers taking part in this ring, in ring order.
    pub fn peers(&self) -> &[Peer] {
        &self.descriptor.peers
    }

    pub fn point_count(&self) -> usize {
        self.placement.point_count()
    }

    /// Same kind and replication factor with `peers` appended, at the next
    /// version.
    pub fn with_peers_added(&self, peers: &[Peer]) -> Result<RingDescriptor> {
        let mut next = self.descriptor.peers.clone();
        next.extend_from_slice(peers);
        self.rebuild(next)
    }

    /// Same kind and replication factor without `ids`, at the next version.
    pub fn with_peers_removed(&self, ids: &[PeerId]) -> Result<RingDescriptor> {
        if let Some(missing) = ids
            .iter()
            .find(|id| !self.descriptor.peers.iter().any(|p| &p.id == *id))
        {
            return Err(Error::UnknownPeer(missing.clone()));
        }
        let next = self
            .descriptor
            .peers
            .iter()
            .filter(|p| !ids.contains(&p.id))
            .cloned()
            .collect();
        self.rebuild(next)
    }

    fn rebuild(&self, peers: Vec<Peer>) -> Result<RingDescriptor> {
        let kind = self.descriptor.kind;
        if !kind.is_resizable() {
            return Err(Error::InvalidPeerCount {
                kind,
                count: peers.len(),
            });
        }
        build(
            kind,
            peers,
            self.descriptor.replication_factor,
            next_version(self.descriptor.version)?,
        )
    }

    /// Human-readable summary for operators. Not used for placement.
    pub fn describe(&self) -> String {
        let d = &self.descriptor;
        let mut out = format!(
            "Ring: {}\nVersion: {}\nReplication: {}\nPeers ({}):",
            d.kind,
            d.version,
            d.replication_factor,
            d.peers.len()
        );
        for peer in &d.peers {
            if peer.is_placeholder() {
                out.push_str(&format!("\n\t{} (no longer in directory)", peer.id));
            } else {
                out.push_str(&format!("\n\t{} {}", peer.id, peer.address));
            }
        }
        if self.point_count() > 0 {
            out.push_str(&format!("\nPoints: {}", self.point_count()));
        }
        out
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("kind", &self.descriptor.kind)
            .field("version", &self.descriptor.version)
            .field("replication_factor", &self.descriptor.replication_factor)
            .field("peers", &self.descriptor.peers.len())
            .finish()
    }
}

impl From<RingDescriptor> for Ring {
    fn from(descriptor: RingDescriptor) -> Self {
        Ring::new(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingBuilder;

    fn abc() -> Vec<Peer> {
        vec![
            Peer::new("A", "10.0.0.1:4000"),
            Peer::new("B", "10.0.0.2:4000"),
            Peer::new("C", "10.0.0.3:4000"),
        ]
    }

    fn ids(peers: &[&Peer]) -> Vec<String> {
        peers.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_mod_key1_pair() {
        let ring = RingBuilder::new(RingKind::Mod)
            .peers(abc())
            .replication_factor(2)
            .version(1)
            .build()
            .unwrap();

        let first = ids(&ring.locate("key1"));
        let index = Token::for_key(b"key1").bucket(3);
        let names = ["A", "B", "C"];
        assert_eq!(first, vec![names[index], names[(index + 1) % 3]]);
        assert_ne!(first[0], first[1]);

        for _ in 0..10 {
            assert_eq!(ids(&ring.locate("key1")), first);
        }
    }

    #[test]
    fn test_empty_locates_nothing() {
        let ring = RingBuilder::new(RingKind::Empty).build().unwrap();
        assert!(ring.locate("anything").is_empty());
        assert!(ring.primary("anything").is_none());
    }

    #[test]
    fn test_single_always_same_peer() {
        let ring = RingBuilder::new(RingKind::Single)
            .add_peer(Peer::new("only", "10.0.0.9:4000"))
            .build()
            .unwrap();
        for key in ["a", "b", "c", "a-much-longer-key"] {
            assert_eq!(ids(&ring.locate(key)), vec!["only"]);
        }
    }

    #[test]
    fn test_add_peers_bumps_version() {
        let ring = RingBuilder::new(RingKind::Ketama)
            .peers(abc())
            .replication_factor(2)
            .version(5)
            .build()
            .unwrap();
        let next = ring
            .with_peers_added(&[Peer::new("D", "10.0.0.4:4000")])
            .unwrap();
        assert_eq!(next.version(), 6);
        assert_eq!(next.peers().len(), 4);
        assert_eq!(next.kind(), RingKind::Ketama);
        assert_eq!(next.replication_factor(), 2);
    }

    #[test]
    fn test_remove_peers() {
        let ring = RingBuilder::new(RingKind::Mod)
            .peers(abc())
            .replication_factor(2)
            .version(1)
            .build()
            .unwrap();
        let next = ring.with_peers_removed(&["B".into()]).unwrap();
        assert_eq!(next.peer_ids(), vec![PeerId::from("A"), PeerId::from("C")]);

        assert_eq!(
            ring.with_peers_removed(&["Z".into()]).unwrap_err(),
            Error::UnknownPeer("Z".into())
        );
        assert!(matches!(
            ring.with_peers_removed(&["A".into(), "B".into()]),
            Err(Error::InvalidReplicationFactor {
                factor: 2,
                peers: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_single_not_resizable() {
        let ring = RingBuilder::new(RingKind::Single)
            .add_peer(Peer::new("only", "x"))
            .build()
            .unwrap();
        assert!(matches!(
            ring.with_peers_added(&[Peer::new("two", "y")]),
            Err(Error::InvalidPeerCount {
                kind: RingKind::Single,
                count: 2
            })
        ));
    }

    #[test]
    fn test_resize_at_last_version() {
        let ring = RingBuilder::new(RingKind::Mod)
            .peers(abc())
            .version(u64::MAX)
            .build()
            .unwrap();
        assert_eq!(
            ring.with_peers_removed(&["C".into()]).unwrap_err(),
            Error::VersionExhausted { current: u64::MAX }
        );
    }

    #[test]
    fn test_describe_peer_without_address() {
        let ring = RingBuilder::new(RingKind::Single)
            .add_peer(Peer::new("local", ""))
            .build()
            .unwrap();
        let text = ring.describe();
        assert!(text.contains("\tlocal "));
        assert!(!text.contains("no longer in directory"));
    }

    #[test]
    fn test_describe() {
        let ring = RingBuilder::new(RingKind::Mod)
            .peers(abc())
            .replication_factor(2)
            .version(3)
            .build()
            .unwrap();
        let text = ring.describe();
        assert!(text.starts_with("Ring: mod\nVersion: 3\nReplication: 2\nPeers (3):"));
        assert!(text.contains("\tB 10.0.0.2:4000"));
        assert_eq!(ring.to_string(), text);
    }
}
