use super::Task;

use std::sync::Arc;
use std::task::{Wake, Waker};

/// Waking a task reschedules it through [`Task::schedule`].
impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().schedule();
    }
}

/// Creates the [`Waker`] handed to the task's future while it is polled.
pub(crate) fn make_waker<T: Send + 'static>(task: &Arc<Task<T>>) -> Waker {
    Waker::from(task.clone())
}
