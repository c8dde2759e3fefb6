use crate::runtime::context::LocalQueues;
use crate::runtime::task::Runnable;
use crate::runtime::work_stealing::injector::InjectorHandle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A worker thread in the executor.
///
/// The execution order is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Index of this worker's queue in `locals`.
    id: usize,

    /// All local queues (one per worker).
    locals: LocalQueues,

    /// Handle to the global injector queue.
    injector: InjectorHandle,
}

impl Worker {
    pub(crate) fn new(id: usize, locals: LocalQueues, injector: InjectorHandle) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    /// Runs the worker loop until `shutdown` is set.
    ///
    /// The caller installs the runtime context for the whole loop.
    pub(crate) fn run(&self, shutdown: &AtomicBool) {
        log::trace!("worker {} started", self.id);

        while !shutdown.load(Ordering::Acquire) {
            let task = self.locals[self.id]
                .pop()
                .or_else(|| self.injector.steal())
                .or_else(|| self.try_steal());

            match task {
                Some(task) => task.run(),
                None => self.injector.park(),
            }
        }

        log::trace!("worker {} stopped", self.id);
    }

    /// Attempts to steal a task from another worker's local queue.
    ///
    /// Victims are visited round-robin starting after this worker.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
