//! Burrows-Wheeler Transform stage for Jampack.
//!
//! Sorts each block's rotations so that bytes sharing similar following
//! context end up adjacent, which is what lets the downstream entropy
//! coder exploit the redundancy the earlier stages couldn't reach. The
//! inverse is carried out as `BWT_UNITS` independent strands (see
//! [`jampack_core::options::BWT_UNITS`]) so decode parallelizes across a
//! thread pool instead of following one long pointer chain.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bwt;

pub use bwt::{forward, inverse};
