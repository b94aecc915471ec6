//! Modulo placement.
//!
//! The primary is `peers[hash(key) % n]`; replicas are the next
//! `replication_factor - 1` peers in ring order, wrapping at the end. Cheap to
//! build and query, but nearly every key moves when `n` changes.

use crate::token::Token;

use super::placement::Placement;

#[derive(Debug)]
pub(crate) struct ModPlacement {
    peer_count: usize,
    replication_factor: usize,
}

impl ModPlacement {
    /// `replication_factor` has already been checked against `peer_count`.
    pub fn new(peer_count: usize, replication_factor: usize) -> Self {
        Self {
            peer_count,
            replication_factor,
        }
    }
}

impl Placement for ModPlacement {
    fn locate(&self, token: Token, out: &mut Vec<usize>) {
        let start = token.bucket(self.peer_count);
        // Peers are distinct and replication_factor <= peer_count, so the
        // walk never revisits an index.
        out.extend((0..self.replication_factor).map(|i| (start + i) % self.peer_count));
    }
}
