use super::Task;
use super::error::JoinError;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A handle to a spawned task.
///
/// A `JoinHandle` allows awaiting the result of a task spawned onto the
/// runtime. It implements [`Future`] and resolves once the task has
/// completed, panicked or been aborted.
///
/// Dropping the `JoinHandle` does **not** cancel the task; it only
/// discards the ability to observe its result. Use [`abort`](Self::abort)
/// to cancel it.
pub struct JoinHandle<T> {
    /// Shared reference to the underlying task.
    task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(task: Arc<Task<T>>) -> Self {
        Self { task }
    }

    /// Returns `true` once the task has finished, whatever the outcome.
    pub fn is_finished(&self) -> bool {
        self.task.is_complete()
    }
}

impl<T: Send + 'static> JoinHandle<T> {
    /// Cancels the task.
    ///
    /// The task's future is dropped the next time the scheduler picks it
    /// up, which also cancels any channel operation it is suspended in.
    /// Awaiting the handle then yields [`JoinError::Cancelled`]. Aborting a
    /// finished task has no effect.
    pub fn abort(&self) {
        self.task.cancel();
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = Result<T, JoinError>;

    /// Polls the join handle.
    ///
    /// The waker is registered **before** re-checking the task state to
    /// avoid missed wake-ups.
    ///
    /// # Panics
    ///
    /// Panics if polled again after it returned `Poll::Ready`.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.task.is_complete() {
            return Poll::Ready(self.take());
        }

        self.task.set_join_waker(cx.waker());

        if self.task.is_complete() {
            return Poll::Ready(self.take());
        }

        Poll::Pending
    }
}

impl<T> JoinHandle<T> {
    fn take(&self) -> Result<T, JoinError> {
        self.task
            .take_output()
            .expect("`JoinHandle` polled after completion")
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}
