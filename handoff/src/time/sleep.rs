use crate::reactor::TimerEntry;
use crate::reactor::command::Command;
use crate::runtime::context::CURRENT_REACTOR;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

/// Waits until `duration` has elapsed.
///
/// A duration too large to add to the current instant, such as
/// `Duration::MAX`, waits forever.
///
/// # Panics
///
/// The returned future panics if polled outside of a handoff runtime.
///
/// ```rust,ignore
/// sleep(Duration::from_millis(100)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// Future returned by [`sleep`].
///
/// The timer is registered with the reactor on first poll, and again if
/// the future is later polled with a different waker.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Sleep {
    /// `None` when the deadline is too far away to represent: such a sleep
    /// never completes and never registers a timer.
    deadline: Option<Instant>,

    /// Waker of the last registration.
    registered: Option<Waker>,

    /// Shared with the reactor so that a dropped sleep never fires.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(duration),
            registered: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let Some(deadline) = this.deadline else {
            return Poll::Pending;
        };

        if Instant::now() >= deadline {
            return Poll::Ready(());
        }

        if this
            .registered
            .as_ref()
            .is_some_and(|waker| waker.will_wake(cx.waker()))
        {
            return Poll::Pending;
        }

        // A stale registration only causes a spurious wake-up.
        this.registered = Some(cx.waker().clone());

        CURRENT_REACTOR.with(|cell| {
            let binding = cell.borrow();
            let reactor = binding
                .as_ref()
                .expect("`Sleep` polled outside of a handoff runtime");

            let _ = reactor.send(Command::SetTimer(TimerEntry {
                deadline,
                waker: cx.waker().clone(),
                cancelled: this.cancelled.clone(),
            }));
        });

        Poll::Pending
    }
}

impl Drop for Sleep {
    /// Cancels the timer so the reactor does not wake an abandoned task.
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
