use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A per-worker local task queue.
///
/// The owning worker pushes and pops at the back (LIFO), which keeps the
/// most recently spawned task hot in cache. Other workers steal from the
/// front (FIFO).
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    /// Creates an empty local task queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.lock().push_back(task);
    }

    /// Pops the most recently pushed task. Owner only.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.lock().pop_back()
    }

    /// Steals the oldest task. Used by other workers.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.lock().pop_front()
    }

    /// Removes every queued task, see [`Injector::drain`].
    ///
    /// [`Injector::drain`]: super::injector::Injector::drain
    pub(crate) fn drain(&self) -> Vec<Arc<dyn Runnable>> {
        self.lock().drain(..).collect()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Arc<dyn Runnable>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
