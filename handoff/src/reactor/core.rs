use super::TimerEntry;
use super::command::Command;

use std::collections::BinaryHeap;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Sending half used to submit [`Command`]s to the reactor thread.
pub(crate) type ReactorHandle = Sender<Command>;

/// The timer reactor.
///
/// Blocks on its command queue until the earliest pending deadline, then
/// wakes every timer that expired.
pub(crate) struct Reactor {
    receiver: Receiver<Command>,

    /// Pending timers, earliest deadline on top.
    timers: BinaryHeap<TimerEntry>,
}

impl Reactor {
    /// Spawns the reactor thread and returns a handle to it.
    pub(crate) fn start(thread_name: &str) -> (ReactorHandle, JoinHandle<()>) {
        let (transmitter, receiver) = channel();

        let reactor = Reactor {
            receiver,
            timers: BinaryHeap::new(),
        };

        let thread = thread::Builder::new()
            .name(format!("{thread_name}-timer"))
            .spawn(move || reactor.run())
            .unwrap_or_else(|err| panic!("failed to spawn reactor thread: {err}"));

        (transmitter, thread)
    }

    fn run(mut self) {
        log::trace!("reactor started");

        loop {
            let command = match self.next_deadline() {
                Some(deadline) => self
                    .receiver
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self
                    .receiver
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match command {
                Ok(Command::SetTimer(entry)) => self.timers.push(entry),
                Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            self.fire_expired();
        }

        log::trace!("reactor stopped with {} pending timers", self.timers.len());
    }

    /// Deadline of the earliest live timer.
    ///
    /// Cancelled timers on top of the heap are discarded on the way.
    fn next_deadline(&mut self) -> Option<Instant> {
        while self.timers.peek()?.is_cancelled() {
            self.timers.pop();
        }

        self.timers.peek().map(|timer| timer.deadline)
    }

    /// Wakes every timer whose deadline has passed.
    fn fire_expired(&mut self) {
        let now = Instant::now();

        while self.timers.peek().is_some_and(|timer| timer.deadline <= now) {
            let Some(timer) = self.timers.pop() else {
                break;
            };

            if !timer.is_cancelled() {
                timer.waker.wake();
            }
        }
    }
}
