//! Task executor implementation.
//!
//! - [`core`]: executor lifecycle, spawning and shutdown,
//! - [`worker`]: worker threads running tasks with work stealing.

pub(crate) mod core;
pub(crate) mod worker;
