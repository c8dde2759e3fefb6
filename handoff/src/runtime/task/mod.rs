//! Asynchronous task primitives.
//!
//! This module defines how the runtime represents, schedules and executes
//! asynchronous tasks:
//! - task state management and the custom waker,
//! - [`JoinHandle`]s for awaiting or aborting a task,
//! - [`JoinSet`] for structured groups of tasks,
//! - [`JoinError`] describing a task that did not return normally.
//!
//! Most users will interact with this module through [`spawn`]; the
//! lower-level components are used internally by the executor.

mod core;
mod error;
mod handle;
mod set;
mod state;
mod waker;

pub(crate) use self::core::{Runnable, Task};

pub use self::core::spawn;
pub use error::JoinError;
pub use handle::JoinHandle;
pub use set::JoinSet;
