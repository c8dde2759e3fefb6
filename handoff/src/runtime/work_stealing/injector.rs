use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Upper bound on how long an idle worker sleeps before looking for work
/// again. Tasks pushed onto another worker's local queue do not signal the
/// condition variable, so parking must not be indefinite.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Number of registered tasks before dead entries are first pruned.
const MIN_PRUNE_THRESHOLD: usize = 64;

/// Global task injector for the work-stealing scheduler.
///
/// Tasks spawned from outside a worker, and tasks rescheduled by their
/// waker, land here before a worker picks them up. Idle workers park on
/// the injector's condition variable.
///
/// The injector also keeps a weak reference to every task spawned on the
/// runtime, so that shutdown can reach tasks that sit in no queue because
/// they are suspended.
pub(crate) struct Injector {
    /// Queue holding globally injected tasks.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Signalled whenever a task is pushed or the executor shuts down.
    condvar: Condvar,

    /// Indicates whether the executor is shutting down.
    shutdown: AtomicBool,

    /// Every spawned task that may still be alive.
    tasks: Mutex<Registry>,
}

struct Registry {
    tasks: Vec<Weak<dyn Runnable>>,

    /// Length at which dead entries are pruned next.
    prune_at: usize,
}

impl Injector {
    /// Creates a new empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
            tasks: Mutex::new(Registry {
                tasks: Vec::new(),
                prune_at: MIN_PRUNE_THRESHOLD,
            }),
        }
    }

    /// Records a newly spawned task.
    pub(crate) fn register(&self, task: Weak<dyn Runnable>) {
        let mut registry = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        if registry.tasks.len() >= registry.prune_at {
            registry.tasks.retain(|task| task.strong_count() > 0);
            registry.prune_at = (registry.tasks.len() * 2).max(MIN_PRUNE_THRESHOLD);
        }

        registry.tasks.push(task);
    }

    /// Takes every registered task that is still alive.
    pub(crate) fn take_tasks(&self) -> Vec<Arc<dyn Runnable>> {
        let mut registry = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        registry.tasks.drain(..).filter_map(|task| task.upgrade()).collect()
    }

    /// Signals shutdown and wakes all parked workers.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        // Taking the lock orders the store before any worker's re-check.
        drop(self.lock());
        self.condvar.notify_all();
    }

    /// Pushes a task into the global queue and wakes one parked worker.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.lock().push_back(task);
        self.condvar.notify_one();
    }

    /// Parks the current worker until a task is pushed, shutdown starts or
    /// [`PARK_TIMEOUT`] elapses.
    pub(crate) fn park(&self) {
        let queue = self.lock();

        if self.shutdown.load(Ordering::Acquire) || !queue.is_empty() {
            return;
        }

        let _ = self.condvar.wait_timeout(queue, PARK_TIMEOUT);
    }

    /// Takes the oldest task from the global queue.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.lock().pop_front()
    }

    /// Removes every queued task.
    ///
    /// Called once the workers are gone so that queued tasks, which hold a
    /// handle to this injector, are released.
    pub(crate) fn drain(&self) -> Vec<Arc<dyn Runnable>> {
        self.lock().drain(..).collect()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Arc<dyn Runnable>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
