use crate::reactor::ReactorHandle;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

/// All local queues of an executor, indexed by worker id.
pub(crate) type LocalQueues = Arc<Vec<Arc<LocalQueue>>>;

thread_local! {
    /// Handle to the reactor of the runtime this thread belongs to.
    ///
    /// Timers read it to register their deadlines.
    pub(crate) static CURRENT_REACTOR: RefCell<Option<ReactorHandle>> =
        const { RefCell::new(None) };

    /// Handle to the global injector queue, used by `spawn`.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// Identifier of the current worker thread, if this is one.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Local queues of every worker, so `spawn` can push onto the current
    /// worker's queue.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<LocalQueues>> =
        const { RefCell::new(None) };
}

/// Enters the runtime execution context for the current thread.
///
/// Installs the reactor and injector handles for the duration of `f`, then
/// restores whatever was installed before, so that nested runtimes behave.
pub(crate) fn enter_context<R>(
    reactor: ReactorHandle,
    injector: InjectorHandle,
    f: impl FnOnce() -> R,
) -> R {
    let prev_reactor = CURRENT_REACTOR.with(|r| r.replace(Some(reactor)));
    let prev_injector = CURRENT_INJECTOR.with(|i| i.replace(Some(injector)));

    let out = f();

    CURRENT_INJECTOR.with(|i| i.replace(prev_injector));
    CURRENT_REACTOR.with(|r| r.replace(prev_reactor));

    out
}

/// Registers the current thread as worker `id` of an executor.
pub(crate) fn enter_worker(id: usize, locals: LocalQueues) {
    CURRENT_WORKER_ID.with(|cell| *cell.borrow_mut() = Some(id));
    CURRENT_LOCALS.with(|cell| *cell.borrow_mut() = Some(locals));
}
