//! Placement rings.
//!
//! A ring maps partition keys onto ordered lists of peers. Four kinds share
//! one placement interface; see [`RingKind`].

pub mod builder;
pub mod descriptor;
pub mod kind;
pub mod migration;
#[allow(clippy::module_inception)]
pub mod ring;

mod ketama;
mod modulo;
mod placement;

pub use builder::{build, RingBuilder};
pub use descriptor::{next_version, RingDescriptor};
pub use kind::RingKind;
pub use migration::{migrations, Migration};
pub use ring::Ring;
