//! Internal utilities.
//!
//! - [`Slab`]: keyed storage with slot reuse, used for channel waiters.
//! - [`block_on`]: drives a future on the calling OS thread by parking it.

mod park;
mod slab;

pub(crate) use park::block_on;
pub(crate) use slab::Slab;
