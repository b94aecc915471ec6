//! Ketama-style consistent hashing.
//!
//! Every peer owns [`POINTS_PER_PEER`](crate::vnode::POINTS_PER_PEER) virtual
//! points on the `u64` circle. A key is hashed onto the circle and the walk
//! proceeds clockwise, collecting the first `replication_factor` distinct
//! physical peers. When a peer leaves, only the arcs its points owned are
//! remapped.
//!
//! Construction is O(peers × points · log) for the sort; lookup is a binary
//! search over the sorted point table.

use crate::peer::Peer;
use crate::token::Token;
use crate::vnode::{point_tokens, VirtualPoint};

use super::placement::Placement;

#[derive(Debug)]
pub(crate) struct KetamaPlacement {
    /// Sorted by token, ties broken by peer UUID.
    points: Vec<VirtualPoint>,
    replication_factor: usize,
}

impl KetamaPlacement {
    pub fn new(peers: &[Peer], replication_factor: usize) -> Self {
        let mut points: Vec<VirtualPoint> = peers
            .iter()
            .enumerate()
            .flat_map(|(idx, peer)| point_tokens(&peer.id).map(move |t| VirtualPoint::new(t, idx)))
            .collect();
        points.sort_by(|a, b| {
            a.token
                .cmp(&b.token)
                .then_with(|| peers[a.peer].id.cmp(&peers[b.peer].id))
        });

        Self {
            points,
            replication_factor,
        }
    }
}

impl Placement for KetamaPlacement {
    fn locate(&self, token: Token, out: &mut Vec<usize>) {
        if self.points.is_empty() {
            return;
        }
        let start = self.points.partition_point(|p| p.token < token);
        let (after, before) = self.points.split_at(start);

        for point in after.iter().chain(before) {
            if !out.contains(&point.peer) {
                out.push(point.peer);
                if out.len() == self.replication_factor {
                    break;
                }
            }
        }
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::POINTS_PER_PEER;

    fn peers(n: usize) -> Vec<Peer> {
        (0..n)
            .map(|i| Peer::new(format!("peer-{i}"), format!("10.0.0.{i}:4000")))
            .collect()
    }

    #[test]
    fn test_points_sorted() {
        let placement = KetamaPlacement::new(&peers(4), 2);
        assert_eq!(placement.point_count(), 4 * POINTS_PER_PEER);
        assert!(placement.points.windows(2).all(|w| w[0].token <= w[1].token));
    }

    #[test]
    fn test_wraps_past_last_point() {
        let placement = KetamaPlacement::new(&peers(3), 3);
        let mut out = Vec::new();
        placement.locate(Token(u64::MAX), &mut out);
        assert_eq!(out.len(), 3);
        // Past the last point the walk restarts at the first one.
        assert_eq!(out[0], placement.points[0].peer);
    }

    #[test]
    fn test_distinct_peers() {
        let placement = KetamaPlacement::new(&peers(5), 3);
        for i in 0..500u64 {
            let mut out = Vec::new();
            placement.locate(Token::for_key(&i.to_le_bytes()), &mut out);
            let mut unique = out.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 3);
        }
    }
}
