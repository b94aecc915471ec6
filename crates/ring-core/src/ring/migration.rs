//! Primary reassignments between two rings.

use crate::peer::PeerId;

use super::Ring;

/// A sampled key whose primary differs between two rings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration<'k> {
    pub key: &'k [u8],
    /// Primary under the old ring; `None` if it placed nothing.
    pub from: Option<PeerId>,
    /// Primary under the new ring; `None` if it places nothing.
    pub to: Option<PeerId>,
}

/// Keys from `keys` whose primary changes when `old` is replaced by `new`.
pub fn migrations<'k, K: AsRef<[u8]>>(old: &Ring, new: &Ring, keys: &'k [K]) -> Vec<Migration<'k>> {
    keys.iter()
        .filter_map(|key| {
            let key = key.as_ref();
            let from = old.primary(key).map(|p| p.id.clone());
            let to = new.primary(key).map(|p| p.id.clone());
            (from != to).then_some(Migration { key, from, to })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::Peer;
    use crate::ring::{RingBuilder, RingKind};

    fn ring(kind: RingKind, n: usize) -> Ring {
        RingBuilder::new(kind)
            .peers((0..n).map(|i| Peer::new(format!("peer-{i}"), "addr")))
            .replication_factor(1)
            .version(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_identical_rings_do_not_migrate() {
        let keys: Vec<String> = (0..200).map(|i| format!("k{i}")).collect();
        let a = ring(RingKind::Ketama, 4);
        let b = ring(RingKind::Ketama, 4);
        assert!(migrations(&a, &b, &keys).is_empty());
    }

    #[test]
    fn test_added_peer_only_receives() {
        let keys: Vec<String> = (0..2000).map(|i| format!("k{i}")).collect();
        let old = ring(RingKind::Ketama, 3);
        let new = Ring::new(
            old.with_peers_added(&[Peer::new("peer-new", "addr")])
                .unwrap(),
        );
        let moved = migrations(&old, &new, &keys);
        assert!(!moved.is_empty());
        for m in &moved {
            assert_eq!(m.to, Some(PeerId::from("peer-new")));
        }
    }

    #[test]
    fn test_to_empty_moves_everything() {
        let keys = ["a", "b", "c"];
        let old = ring(RingKind::Mod, 2);
        let new = RingBuilder::new(RingKind::Empty).build().unwrap();
        let moved = migrations(&old, &new, &keys);
        assert_eq!(moved.len(), 3);
        assert!(moved.iter().all(|m| m.to.is_none() && m.from.is_some()));
    }
}
