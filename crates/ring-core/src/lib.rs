//! Core library for cluster placement rings.
//!
//! This crate provides the pure half of ring management:
//! - Peers and the peer directory
//! - Ring kinds (empty, single, mod, ketama) behind one placement interface
//! - The validating ring builder and immutable ring descriptors
//! - The versioned, persisted ring record
//!
//! Nothing here performs I/O. Installing a ring cluster-wide is the job of
//! the `ring-store` crate.

pub mod error;
pub mod peer;
pub mod record;
pub mod ring;
pub mod token;
pub mod vnode;

pub use error::{Error, Result};
pub use peer::{Peer, PeerDirectory, PeerId, PeerSelection};
pub use record::{RingRecord, RECORD_FORMAT};
pub use ring::{
    build, migrations, next_version, Migration, Ring, RingBuilder, RingDescriptor, RingKind,
};
pub use token::Token;
pub use vnode::{VirtualPoint, POINTS_PER_PEER};
