use super::builder::RuntimeBuilder;
use super::executor::core::Executor;
use super::task::{JoinError, JoinHandle};
use crate::reactor::command::Command;
use crate::reactor::{Reactor, ReactorHandle};
use crate::utils::block_on;

use std::future::Future;
use std::panic;
use std::thread::JoinHandle as ThreadHandle;

/// The main runtime handle.
///
/// A `Runtime` owns a pool of worker threads that run spawned tasks and a
/// timer thread that drives [`sleep`](crate::time::sleep) and
/// [`timeout`](crate::time::timeout).
///
/// Dropping the runtime stops the workers and the timer thread. Tasks that
/// have not completed by then have their future dropped, which cancels any
/// channel operation they were suspended in, and their [`JoinHandle`]s
/// resolve to [`JoinError::Cancelled`].
pub struct Runtime {
    /// Task executor responsible for scheduling and running futures.
    executor: Executor,

    /// Handle used to send commands to the reactor thread.
    reactor_handle: ReactorHandle,

    /// The reactor thread, joined on drop.
    reactor_thread: Option<ThreadHandle<()>>,
}

impl Runtime {
    /// Creates a runtime with the default configuration.
    ///
    /// See [`RuntimeBuilder`] to choose the number of worker threads.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub(crate) fn start(worker_threads: usize, thread_name: &str) -> Self {
        let (reactor_handle, reactor_thread) = Reactor::start(thread_name);
        let executor = Executor::new(reactor_handle.clone(), worker_threads, thread_name);

        Self {
            executor,
            reactor_handle,
            reactor_thread: Some(reactor_thread),
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// The returned [`JoinHandle`] can be awaited for the task's output, or
    /// dropped to let the task run detached.
    ///
    /// ```rust,ignore
    /// let handle = runtime.spawn(async { 21 * 2 });
    /// assert_eq!(runtime.block_on(handle).unwrap(), 42);
    /// ```
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// The future is spawned onto the workers, so it can use
    /// [`task::spawn`](crate::task::spawn) and the timers; the calling
    /// thread only waits for its output.
    ///
    /// Do not call this from inside a task: it would block a worker.
    ///
    /// # Panics
    ///
    /// If the future panics, the panic is resumed on the calling thread.
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match block_on(self.spawn(future)) {
            Ok(output) => output,
            Err(JoinError::Panicked(payload)) => panic::resume_unwind(payload),
            Err(JoinError::Cancelled) => panic!("`block_on` future was cancelled"),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    /// Shuts down the runtime.
    ///
    /// 1. Signals the executor to shut down
    /// 2. Sends a shutdown command to the reactor
    /// 3. Joins all worker threads and cancels unfinished tasks
    /// 4. Joins the reactor thread
    fn drop(&mut self) {
        self.executor.shutdown();

        let _ = self.reactor_handle.send(Command::Shutdown);

        self.executor.join();

        if let Some(thread) = self.reactor_thread.take()
            && thread.join().is_err()
        {
            log::error!("reactor thread panicked during shutdown");
        }

        log::debug!("runtime shut down");
    }
}
