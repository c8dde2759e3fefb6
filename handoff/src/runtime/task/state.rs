//! Task lifecycle states, stored in `Task::state`.
//!
//! ```text
//! QUEUED -> RUNNING -> IDLE -> QUEUED -> ...
//!              |  \
//!              |   NOTIFIED -> QUEUED      (woken while being polled)
//!              v
//!           COMPLETE                       (output stored, future dropped)
//! ```

/// Task is suspended and not scheduled.
pub(crate) const IDLE: usize = 0;

/// Task sits in a run queue.
pub(crate) const QUEUED: usize = 1;

/// Task is being polled. At most one worker observes this state at a time,
/// which is what grants it access to the future.
pub(crate) const RUNNING: usize = 2;

/// Task was woken while running and must be re-queued after the poll.
pub(crate) const NOTIFIED: usize = 3;

/// Task finished: it returned, panicked or was cancelled.
pub(crate) const COMPLETE: usize = 4;
