//! Virtual points for the ketama ring.
//!
//! Each peer owns a fixed number of points on the hash circle. Points are
//! derived only from the peer's UUID and the point index, so any process can
//! rebuild an identical circle from the ring record alone.
//!
//! One BLAKE3 digest of `uuid ++ le32(digest_index)` yields four points (the
//! digest split into little-endian `u64` words), so a peer gets
//! `POINTS_PER_PEER / 4` digests.

use crate::peer::PeerId;
use crate::token::Token;

/// Virtual points per physical peer.
pub const POINTS_PER_PEER: usize = 160;

const POINTS_PER_DIGEST: usize = 4;

/// A virtual point on the circle, owned by the peer at `peer` in the ring's
/// peer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualPoint {
    pub token: Token,
    pub peer: usize,
}

impl VirtualPoint {
    #[inline]
    pub fn new(token: Token, peer: usize) -> Self {
        Self { token, peer }
    }
}

impl std::fmt::Display for VirtualPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VPoint(token={}, peer=#{})", self.token, self.peer)
    }
}

/// Tokens of every virtual point owned by `id`.
pub fn point_tokens(id: &PeerId) -> impl Iterator<Item = Token> + '_ {
    (0..POINTS_PER_PEER / POINTS_PER_DIGEST).flat_map(move |digest_index| {
        let mut input = Vec::with_capacity(id.as_str().len() + 4);
        input.extend_from_slice(id.as_ref());
        input.extend_from_slice(&(digest_index as u32).to_le_bytes());
        let digest = blake3::hash(&input);
        let bytes = *digest.as_bytes();
        (0..POINTS_PER_DIGEST).map(move |word| {
            let mut w = [0u8; 8];
            w.copy_from_slice(&bytes[word * 8..word * 8 + 8]);
            Token(u64::from_le_bytes(w))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_point_count() {
        assert_eq!(point_tokens(&"peer-a".into()).count(), POINTS_PER_PEER);
    }

    #[test]
    fn test_points_reproducible() {
        let a: Vec<_> = point_tokens(&"peer-a".into()).collect();
        let b: Vec<_> = point_tokens(&"peer-a".into()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_points_differ_between_peers() {
        let a: HashSet<_> = point_tokens(&"peer-a".into()).collect();
        let b: HashSet<_> = point_tokens(&"peer-b".into()).collect();
        assert!(a.is_disjoint(&b));
        assert_eq!(a.len(), POINTS_PER_PEER);
    }

    #[test]
    fn test_vpoint_ordering() {
        let p1 = VirtualPoint::new(Token(100), 1);
        let p2 = VirtualPoint::new(Token(200), 0);
        assert!(p1 < p2);
    }
}
