use super::error::SendError;
use crate::utils::Slab;

use std::collections::VecDeque;
use std::task::{Poll, Waker};

/// A sender suspended because its value could not be buffered.
///
/// `value` is taken by a receiver when the handoff happens; an entry whose
/// value is `None` is a completed send waiting for its future to observe it.
struct ParkedSender<T> {
    value: Option<T>,
    waker: Waker,
}

/// A receiver suspended on an empty channel.
struct ParkedReceiver {
    waker: Waker,

    /// Whether the receiver still sits in the wake queue. Cleared when the
    /// receiver is notified and has not yet re-polled.
    queued: bool,
}

/// Everything a channel guards behind its lock.
///
/// Waiters are kept in FIFO queues of slab keys; the futures owning those
/// waiters hold the same keys. Methods never wake anybody themselves: they
/// return the wakers to invoke so the caller can release the lock first.
pub(super) struct State<T> {
    capacity: usize,
    buffer: VecDeque<T>,
    closed: bool,

    senders: Slab<ParkedSender<T>>,
    sender_queue: VecDeque<usize>,

    receivers: Slab<ParkedReceiver>,
    receiver_queue: VecDeque<usize>,
}

impl<T> State<T> {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: VecDeque::new(),
            closed: false,
            senders: Slab::new(4),
            sender_queue: VecDeque::new(),
            receivers: Slab::new(4),
            receiver_queue: VecDeque::new(),
        }
    }

    pub(super) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(super) fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of suspended senders still holding their value.
    pub(super) fn waiting_senders(&self) -> usize {
        self.sender_queue.len()
    }

    /// Number of receivers suspended on this channel.
    pub(super) fn waiting_receivers(&self) -> usize {
        self.receivers.len()
    }

    /// Appends `value` to the buffer if a slot is free.
    ///
    /// On success, returns the waker of the receiver that should pick the
    /// value up. On failure the value is handed back.
    pub(super) fn push(&mut self, value: T) -> Result<Option<Waker>, T> {
        if self.buffer.len() >= self.capacity {
            return Err(value);
        }

        self.buffer.push_back(value);
        Ok(self.notify_receiver())
    }

    /// Takes the next value in send order.
    ///
    /// A buffered value comes first; the oldest parked sender then moves its
    /// value into the freed slot. Without buffered values (always the case
    /// for a rendezvous channel) the value comes straight from the oldest
    /// parked sender. The returned waker belongs to that sender.
    pub(super) fn take(&mut self) -> Option<(T, Option<Waker>)> {
        if let Some(value) = self.buffer.pop_front() {
            let waker = self.next_sender().map(|(refill, waker)| {
                self.buffer.push_back(refill);
                waker
            });

            return Some((value, waker));
        }

        self.next_sender().map(|(value, waker)| (value, Some(waker)))
    }

    fn next_sender(&mut self) -> Option<(T, Waker)> {
        while let Some(key) = self.sender_queue.pop_front() {
            let Some(parked) = self.senders.get_mut(key) else {
                continue;
            };

            if let Some(value) = parked.value.take() {
                return Some((value, parked.waker.clone()));
            }
        }

        None
    }

    /// Parks a sender whose value did not fit and returns its key.
    pub(super) fn park_sender(&mut self, value: T, waker: &Waker) -> usize {
        let key = self.senders.insert(ParkedSender {
            value: Some(value),
            waker: waker.clone(),
        });
        self.sender_queue.push_back(key);

        log::trace!("channel: sender {key} parked");
        key
    }

    /// Re-checks a parked sender.
    ///
    /// Completes with `Ok` once a receiver has taken the value, or with the
    /// value handed back once the channel is closed. Otherwise refreshes the
    /// stored waker and stays pending.
    pub(super) fn poll_sender(&mut self, key: usize, waker: &Waker) -> Poll<Result<(), SendError<T>>> {
        if !self.closed {
            if let Some(parked) = self.senders.get_mut(key) {
                if parked.value.is_some() {
                    if !parked.waker.will_wake(waker) {
                        parked.waker = waker.clone();
                    }
                    return Poll::Pending;
                }
            }
        }

        match self.forget_sender(key) {
            Some(value) => Poll::Ready(Err(SendError(value))),
            None => Poll::Ready(Ok(())),
        }
    }

    /// Removes a parked sender, returning its value if it was never taken.
    ///
    /// Used both on completion and when the send is cancelled; the caller
    /// drops the returned value after releasing the lock.
    pub(super) fn forget_sender(&mut self, key: usize) -> Option<T> {
        let value = self.senders.remove(key)?.value;

        if value.is_some() {
            self.sender_queue.retain(|&queued| queued != key);
        }

        value
    }

    /// Parks a receiver, or re-queues one that was notified but found
    /// nothing to take. Returns the receiver's key.
    pub(super) fn park_receiver(&mut self, key: Option<usize>, waker: &Waker) -> usize {
        if let Some(key) = key {
            if let Some(parked) = self.receivers.get_mut(key) {
                if !parked.waker.will_wake(waker) {
                    parked.waker = waker.clone();
                }

                if !parked.queued {
                    parked.queued = true;
                    self.receiver_queue.push_back(key);
                }

                return key;
            }
        }

        let key = self.receivers.insert(ParkedReceiver {
            waker: waker.clone(),
            queued: true,
        });
        self.receiver_queue.push_back(key);

        log::trace!("channel: receiver {key} parked");
        key
    }

    /// Removes a receiver that obtained a value or observed the close.
    pub(super) fn forget_receiver(&mut self, key: usize) {
        if let Some(parked) = self.receivers.remove(key) {
            if parked.queued {
                self.receiver_queue.retain(|&queued| queued != key);
            }
        }
    }

    /// Removes a receiver whose future was dropped while suspended.
    ///
    /// A receiver that had already been notified took a wake-up that was
    /// meant to deliver a value; if that value is still there, the wake-up
    /// is passed on to the next receiver in line.
    pub(super) fn cancel_receiver(&mut self, key: usize) -> Option<Waker> {
        let parked = self.receivers.remove(key)?;

        if parked.queued {
            self.receiver_queue.retain(|&queued| queued != key);
            return None;
        }

        if self.buffer.is_empty() && self.sender_queue.is_empty() {
            return None;
        }

        self.notify_receiver()
    }

    /// Dequeues the longest-waiting receiver and returns its waker.
    pub(super) fn notify_receiver(&mut self) -> Option<Waker> {
        while let Some(key) = self.receiver_queue.pop_front() {
            if let Some(parked) = self.receivers.get_mut(key) {
                parked.queued = false;
                return Some(parked.waker.clone());
            }
        }

        None
    }

    /// Marks the channel closed.
    ///
    /// Returns `None` if it was already closed, otherwise the wakers of every
    /// suspended sender and receiver. Parked senders keep their values: they
    /// are no longer eligible for delivery and are returned to their owners
    /// on the next poll.
    pub(super) fn close(&mut self) -> Option<Vec<Waker>> {
        if self.closed {
            return None;
        }
        self.closed = true;

        let mut wakers = Vec::with_capacity(self.sender_queue.len() + self.receiver_queue.len());

        for key in self.sender_queue.drain(..) {
            if let Some(parked) = self.senders.get(key) {
                wakers.push(parked.waker.clone());
            }
        }

        for key in self.receiver_queue.drain(..) {
            if let Some(parked) = self.receivers.get_mut(key) {
                parked.queued = false;
                wakers.push(parked.waker.clone());
            }
        }

        Some(wakers)
    }
}
