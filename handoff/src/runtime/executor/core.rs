use super::worker::Worker;
use crate::reactor::ReactorHandle;
use crate::runtime::context::{LocalQueues, enter_context, enter_worker};
use crate::runtime::task::{JoinHandle, Task};
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle as ThreadHandle};

/// Multi-threaded task executor.
///
/// Owns the global injector, one local queue per worker and the worker
/// threads themselves.
pub(crate) struct Executor {
    /// Global injector queue shared by all workers.
    injector: InjectorHandle,

    /// Local queues, one per worker.
    locals: LocalQueues,

    /// Join handles for worker threads.
    handles: Vec<ThreadHandle<()>>,

    /// Shutdown flag shared with all workers.
    shutdown: Arc<AtomicBool>,
}

impl Executor {
    /// Creates a new executor and starts `threads` workers.
    ///
    /// Each worker thread is named `{thread_name}-{id}` and runs inside the
    /// runtime context for its whole lifetime.
    pub(crate) fn new(reactor: ReactorHandle, threads: usize, thread_name: &str) -> Self {
        let injector = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let locals: LocalQueues = Arc::new(
            (0..threads)
                .map(|_| Arc::new(LocalQueue::new()))
                .collect(),
        );

        let handles = (0..threads)
            .map(|id| {
                let worker = Worker::new(id, locals.clone(), injector.clone());

                let locals = locals.clone();
                let reactor = reactor.clone();
                let injector = injector.clone();
                let shutdown = shutdown.clone();

                thread::Builder::new()
                    .name(format!("{thread_name}-{id}"))
                    .spawn(move || {
                        enter_worker(id, locals);
                        enter_context(reactor, injector, || worker.run(&shutdown));
                    })
                    .unwrap_or_else(|err| panic!("failed to spawn worker thread {id}: {err}"))
            })
            .collect();

        log::debug!("executor started with {threads} worker threads");

        Self {
            injector,
            locals,
            handles,
            shutdown,
        }
    }

    /// Spawns a new task onto the global injector.
    pub(crate) fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let task = Task::new(future, self.injector.clone());
        self.injector.push(task.clone());

        JoinHandle::new(task)
    }

    /// Signals all workers to shut down and wakes the parked ones.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.injector.shutdown();
    }

    /// Waits for all worker threads to terminate, then cancels every task
    /// that has not completed.
    ///
    /// Unfinished tasks have their future dropped on the calling thread,
    /// which cancels whatever channel operation or timer they were
    /// suspended on. Their `JoinHandle`s resolve to `JoinError::Cancelled`.
    ///
    /// Must be called after [`shutdown`](Self::shutdown).
    pub(crate) fn join(&mut self) {
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                log::error!("worker thread panicked during shutdown");
            }
        }

        let tasks = self.injector.take_tasks();
        let unfinished = tasks.len();

        for task in tasks {
            task.shutdown();
        }

        // Cancelling futures may have woken other tasks; their queue
        // entries are the last references keeping them alive.
        self.injector.drain();
        for local in self.locals.iter() {
            local.drain();
        }

        if unfinished > 0 {
            log::debug!("executor cancelled {unfinished} unfinished tasks");
        }
    }
}
