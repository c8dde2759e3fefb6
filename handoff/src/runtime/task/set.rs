use super::error::JoinError;
use super::{JoinHandle, spawn};

use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::Poll;

/// A group of tasks whose lifetime is bound to the set.
///
/// `JoinSet` is the structured counterpart of [`spawn`]: tasks spawned into
/// the set are awaited through it, and dropping the set aborts every task
/// it still owns. Useful to:
/// - run a group of producers/consumers and wait for all of them,
/// - collect results in completion order,
/// - make sure no background task outlives its owner.
pub struct JoinSet<T: Send + 'static> {
    handles: Vec<JoinHandle<T>>,
}

impl<T: Send + 'static> JoinSet<T> {
    /// Creates a new, empty `JoinSet`.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawns a new task into the set.
    ///
    /// The task is immediately scheduled on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a running runtime.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.handles.push(spawn(future));
    }

    /// Number of tasks in the set, including finished tasks whose result
    /// has not been joined yet.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the set contains no tasks.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for the next task in the set to finish and returns its outcome.
    ///
    /// Results come in completion order. Returns `None` if the set is empty.
    pub async fn join_next(&mut self) -> Option<Result<T, JoinError>> {
        if self.handles.is_empty() {
            return None;
        }

        poll_fn(|cx| {
            for i in 0..self.handles.len() {
                if let Poll::Ready(outcome) = Pin::new(&mut self.handles[i]).poll(cx) {
                    // Completion order is all callers can rely on.
                    self.handles.swap_remove(i);
                    return Poll::Ready(Some(outcome));
                }
            }
            Poll::Pending
        })
        .await
    }

    /// Waits for every task in the set and returns their outcomes in
    /// completion order.
    pub async fn join_all(&mut self) -> Vec<Result<T, JoinError>> {
        let mut outcomes = Vec::with_capacity(self.handles.len());

        while let Some(outcome) = self.join_next().await {
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Aborts every task in the set and empties it.
    ///
    /// Results of tasks that had not been joined yet are discarded.
    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl<T: Send + 'static> Default for JoinSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Drop for JoinSet<T> {
    /// Aborts all tasks still owned by the set.
    fn drop(&mut self) {
        self.abort_all();
    }
}
