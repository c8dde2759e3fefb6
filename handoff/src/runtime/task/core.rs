use super::JoinHandle;
use super::error::{JoinError, panic_message};
use super::state::{COMPLETE, IDLE, NOTIFIED, QUEUED, RUNNING};
use super::waker::make_waker;
use crate::runtime::context::{CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::work_stealing::injector::InjectorHandle;

use std::cell::UnsafeCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

/// A runnable unit of work that can be executed by the scheduler.
///
/// The `Runnable` trait abstracts the specific return type of a task,
/// allowing the executor to manage a heterogeneous collection of tasks
/// through `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Executes the task. This is typically called by a worker thread.
    fn run(self: Arc<Self>);

    /// Cancels the task from outside the scheduler once every worker has
    /// stopped, dropping its future on the calling thread.
    fn shutdown(self: Arc<Self>);
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A spawned asynchronous task managed by the runtime.
///
/// A `Task` owns its future until the future completes, panics or the task
/// is cancelled; the outcome is then stored for the [`JoinHandle`].
pub(crate) struct Task<T> {
    /// The underlying future, dropped as soon as the task completes.
    ///
    /// Only touched by the worker that moved the task into `RUNNING`.
    future: UnsafeCell<Option<BoxFuture<T>>>,

    /// Outcome of the task, written once before `state` becomes `COMPLETE`.
    output: UnsafeCell<Option<Result<T, JoinError>>>,

    /// Lifecycle state, see [`super::state`].
    state: AtomicUsize,

    /// Set by [`cancel`](Self::cancel); observed at the next scheduling point.
    cancelled: AtomicBool,

    /// Reference to the global injector queue for rescheduling.
    injector: InjectorHandle,

    /// Waker of the `JoinHandle` awaiting this task, if any.
    join_waker: Mutex<Option<Waker>>,
}

// Safety: the future and output cells are only accessed under the
// exclusivity granted by the `state` machine.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T> Task<T> {
    /// Returns `true` once the task has produced its outcome.
    pub(crate) fn is_complete(&self) -> bool {
        self.state.load(Ordering::Acquire) == COMPLETE
    }

    /// Takes the outcome of a completed task.
    ///
    /// Returns `None` while the task is still running, or if the outcome
    /// has already been taken.
    pub(crate) fn take_output(&self) -> Option<Result<T, JoinError>> {
        if !self.is_complete() {
            return None;
        }

        // Safety: `output` is never written again after `COMPLETE`, and the
        // single `JoinHandle` is the only reader.
        unsafe { (*self.output.get()).take() }
    }

    /// Registers the waker to notify on completion.
    pub(crate) fn set_join_waker(&self, waker: &Waker) {
        let mut slot = self
            .join_waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match slot.as_ref() {
            Some(current) if current.will_wake(waker) => {}
            _ => *slot = Some(waker.clone()),
        }
    }
}

impl<T: Send + 'static> Task<T> {
    /// Creates a new task from a future and registers it with the
    /// injector.
    ///
    /// The task starts `QUEUED`: the caller is expected to push it onto a
    /// run queue right away.
    pub(crate) fn new<F>(future: F, injector: InjectorHandle) -> Arc<Self>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let task = Arc::new(Self {
            future: UnsafeCell::new(Some(Box::pin(future))),
            output: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            cancelled: AtomicBool::new(false),
            injector,
            join_waker: Mutex::new(None),
        });

        let runnable: Arc<dyn Runnable> = task.clone();
        task.injector.register(Arc::downgrade(&runnable));

        task
    }

    /// Polls the task once.
    ///
    /// - `Poll::Pending`: transitions back to `IDLE`, or re-queues if the
    ///   task was woken during the poll.
    /// - `Poll::Ready` or a panic: stores the outcome and wakes the
    ///   `JoinHandle`.
    /// - Cancelled: drops the future without polling it.
    pub(crate) fn run(self: Arc<Self>) {
        if self
            .state
            .compare_exchange(QUEUED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let outcome = if self.cancelled.load(Ordering::Acquire) {
            Some(Err(JoinError::Cancelled))
        } else {
            self.poll_future()
        };

        match outcome {
            Some(outcome) => self.complete(outcome),
            None => {
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken while running; the wake-up left the task NOTIFIED.
                    self.state.store(QUEUED, Ordering::Release);
                    self.injector.push(self.clone());
                }
            }
        }
    }

    /// Polls the inner future, catching panics.
    ///
    /// Returns `None` while the future is pending.
    fn poll_future(self: &Arc<Self>) -> Option<Result<T, JoinError>> {
        let waker = make_waker(self);
        let mut cx = Context::from_waker(&waker);

        // Safety: the RUNNING state guarantees that no other thread touches
        // the future.
        let future = unsafe { &mut *self.future.get() };
        let future = future.as_mut()?;

        match panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx))) {
            Ok(Poll::Pending) => None,
            Ok(Poll::Ready(value)) => Some(Ok(value)),
            Err(payload) => {
                log::error!("task panicked: {}", panic_message(payload.as_ref()));
                Some(Err(JoinError::Panicked(payload)))
            }
        }
    }

    /// Stores the outcome, drops the future and wakes the `JoinHandle`.
    ///
    /// Must only be called while the task is `RUNNING` (or `NOTIFIED`).
    fn complete(&self, outcome: Result<T, JoinError>) {
        // Dropping the future cancels whatever it was suspended on.
        // Safety: still RUNNING, see `poll_future`.
        let future = unsafe { (*self.future.get()).take() };
        drop(future);

        // Safety: the output is published by the `COMPLETE` store below.
        unsafe {
            *self.output.get() = Some(outcome);
        }
        self.state.store(COMPLETE, Ordering::Release);

        let waker = self
            .join_waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Signals the task to be rescheduled.
    ///
    /// If the task is `IDLE`, it moves to `QUEUED` and is pushed to the
    /// injector. If the task is `RUNNING`, it moves to `NOTIFIED` so that it
    /// is re-polled right after its current execution slice.
    pub(crate) fn schedule(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            let next = match state {
                IDLE => QUEUED,
                RUNNING => NOTIFIED,
                _ => return,
            };

            if self
                .state
                .compare_exchange(state, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if next == QUEUED {
                    self.injector.push(self.clone());
                }
                return;
            }
        }
    }

    /// Requests cancellation.
    ///
    /// The future is dropped by the next worker that picks the task up; a
    /// task that already completed keeps its outcome.
    pub(crate) fn cancel(self: &Arc<Self>) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.clone().schedule();
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }

    fn shutdown(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            if state == COMPLETE {
                return;
            }

            // Taking RUNNING grants access to the future; with the workers
            // gone nothing else can hold it.
            if self
                .state
                .compare_exchange(state, RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }

        self.cancelled.store(true, Ordering::Release);
        self.complete(Err(JoinError::Cancelled));
    }
}

/// Spawns a future as a task onto the current runtime.
///
/// On a worker thread the task goes to that worker's local queue for
/// better cache locality; otherwise it is pushed to the global injector.
///
/// The returned [`JoinHandle`] resolves to the task's output. Dropping it
/// detaches the task, which keeps running.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let injector = CURRENT_INJECTOR
        .with(|cell| cell.borrow().clone())
        .expect("`spawn` must be called within the context of a handoff runtime");

    let task = Task::new(future, injector.clone());

    let pushed_locally = CURRENT_WORKER_ID.with(|id| {
        let Some(id) = *id.borrow() else {
            return false;
        };

        CURRENT_LOCALS.with(|locals| match locals.borrow().as_ref() {
            Some(locals) => {
                locals[id].push(task.clone());
                true
            }
            None => false,
        })
    });

    if !pushed_locally {
        injector.push(task.clone());
    }

    JoinHandle::new(task)
}
