//! Work-stealing scheduler queues.
//!
//! - [`injector`]: the global queue for tasks scheduled from outside a
//!   worker (and for woken tasks), also used to park idle workers.
//! - [`queue`]: per-worker local queues used for fast local execution
//!   and task stealing.

pub(crate) mod injector;
pub(crate) mod queue;
