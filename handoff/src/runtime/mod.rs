//! Task runtime.
//!
//! A multi-threaded, work-stealing executor for async tasks, with:
//! - [`task`]: spawning, joining and aborting tasks,
//! - [`RuntimeBuilder`](builder::RuntimeBuilder): runtime configuration,
//! - [`yield_now`](yield_now::yield_now): cooperative yielding.

mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
