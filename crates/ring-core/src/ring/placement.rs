//! The placement function shared by every ring kind.

use std::fmt::Debug;

use crate::token::Token;

/// Maps a key's token to the indices (into the ring's peer list) of the
/// peers responsible for it, primary first.
///
/// Implementations are immutable once constructed, so a single instance can
/// serve any number of concurrent lookups.
pub(crate) trait Placement: Send + Sync + Debug {
    /// Append the responsible peer indices for `token` to `out`.
    fn locate(&self, token: Token, out: &mut Vec<usize>);

    /// Number of points on the hash circle, for kinds that have one.
    fn point_count(&self) -> usize {
        0
    }
}

#[derive(Debug)]
pub(crate) struct EmptyPlacement;

impl Placement for EmptyPlacement {
    fn locate(&self, _token: Token, _out: &mut Vec<usize>) {}
}

#[derive(Debug)]
pub(crate) struct SinglePlacement;

impl Placement for SinglePlacement {
    fn locate(&self, _token: Token, out: &mut Vec<usize>) {
        out.push(0);
    }
}
