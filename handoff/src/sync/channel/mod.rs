//! Rendezvous and bounded handoff channels.
//!
//! A [`Channel`] moves values between independently scheduled tasks (or OS
//! threads) in send order. Its [`Capacity`] decides when a sender suspends:
//!
//! - **Rendezvous** (capacity `0`): `send` suspends until a `receive` has
//!   taken the value; each send pairs with exactly one receive.
//! - **Bounded** (capacity `N`): up to `N` values are buffered; further
//!   sends suspend until a receive frees a slot.
//!
//! Closing a channel is permanent. Values buffered before the close stay
//! receivable; suspended senders get their value back in a [`SendError`]
//! and receivers observe [`ChannelClosed`] once the buffer is drained.
//!
//! ```rust,ignore
//! use handoff::sync::Channel;
//! use handoff::task;
//!
//! let channel = Channel::rendezvous();
//!
//! let sender = channel.clone();
//! task::spawn(async move {
//!     sender.send(10).await?;
//!     sender.close();
//!     Ok::<_, handoff::sync::SendError<i32>>(())
//! });
//!
//! while let Ok(value) = channel.receive().await {
//!     println!("received {value}");
//! }
//! ```

mod config;
mod error;
mod future;
mod state;

pub use config::{Capacity, ChannelBuilder};
pub use error::{ChannelClosed, ConfigError, SendError, TryRecvError, TrySendError};
pub use future::{ReceiveFuture, SendFuture};

use state::State;

use crate::utils::block_on;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A multi-producer, multi-consumer handoff channel.
///
/// `Channel<T>` is a handle: cloning it is cheap and every clone refers to
/// the same channel. The channel lives until the last handle is dropped;
/// dropping handles does **not** close it, only [`close`](Self::close) does.
pub struct Channel<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    capacity: Capacity,

    /// Buffer, closed flag and waiter queues.
    ///
    /// Held only for short, non-blocking sections. Wakers are always
    /// invoked after the guard is released.
    state: Mutex<State<T>>,
}

impl<T> Channel<T> {
    /// Creates a channel buffering up to `capacity` values, `0` meaning
    /// rendezvous.
    ///
    /// The buffer is allocated as values arrive. To build a channel from an
    /// untrusted or signed size, go through [`Capacity`]'s `TryFrom<i64>` or
    /// `FromStr`, which report a [`ConfigError`].
    pub fn new(capacity: usize) -> Self {
        Self::with_capacity(Capacity::new(capacity))
    }

    /// Creates a rendezvous channel.
    pub fn rendezvous() -> Self {
        Self::with_capacity(Capacity::Rendezvous)
    }

    /// Creates a channel with an already validated capacity.
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            shared: Arc::new(Shared {
                capacity,
                state: Mutex::new(State::new(capacity.get())),
            }),
        }
    }

    /// Returns a [`ChannelBuilder`].
    pub fn builder() -> ChannelBuilder {
        ChannelBuilder::new()
    }

    /// Sends a value, suspending while the channel has no room for it.
    ///
    /// For a rendezvous channel the future resolves only once a receiver
    /// has taken the value. Wakes at most one suspended receiver.
    ///
    /// # Errors
    ///
    /// Returns the value in a [`SendError`] if the channel is closed when
    /// the send starts or while it is suspended.
    pub fn send(&self, value: T) -> SendFuture<'_, T> {
        SendFuture::new(self, value)
    }

    /// Receives the next value, suspending while the channel is empty.
    ///
    /// # Errors
    ///
    /// [`ChannelClosed`] once the channel is closed and every buffered
    /// value has been received.
    pub fn receive(&self) -> ReceiveFuture<'_, T> {
        ReceiveFuture::new(self)
    }

    /// Attempts to buffer a value without suspending.
    ///
    /// A rendezvous channel has no buffer, so this always fails with
    /// [`TrySendError::Full`] unless the channel is closed.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        let mut state = self.lock();

        if state.is_closed() {
            return Err(TrySendError::Closed(value));
        }

        let receiver = state.push(value).map_err(TrySendError::Full)?;
        drop(state);

        if let Some(waker) = receiver {
            waker.wake();
        }
        Ok(())
    }

    /// Attempts to receive a value without suspending.
    ///
    /// Takes a buffered value, or the value of a suspended sender (which
    /// completes that sender's rendezvous).
    pub fn try_receive(&self) -> Result<T, TryRecvError> {
        let mut state = self.lock();

        match state.take() {
            Some((value, sender)) => {
                drop(state);

                if let Some(waker) = sender {
                    waker.wake();
                }
                Ok(value)
            }
            None if state.is_closed() => Err(TryRecvError::Closed),
            None => Err(TryRecvError::Empty),
        }
    }

    /// Sends a value, blocking the current OS thread instead of a task.
    ///
    /// Same contract as [`send`](Self::send). Do not call this from a task
    /// running on the runtime: it blocks the worker thread.
    pub fn send_blocking(&self, value: T) -> Result<(), SendError<T>> {
        block_on(self.send(value))
    }

    /// Receives a value, blocking the current OS thread instead of a task.
    ///
    /// Same contract as [`receive`](Self::receive). Do not call this from a
    /// task running on the runtime: it blocks the worker thread.
    pub fn receive_blocking(&self) -> Result<T, ChannelClosed> {
        block_on(self.receive())
    }

    /// Closes the channel.
    ///
    /// Wakes every suspended sender and receiver. Returns `true` if this
    /// call closed the channel, `false` if it was already closed; calling
    /// it again has no further effect.
    pub fn close(&self) -> bool {
        let Some(wakers) = self.lock().close() else {
            return false;
        };

        log::debug!(
            "channel closed ({} suspended operations woken)",
            wakers.len()
        );

        for waker in wakers {
            waker.wake();
        }
        true
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().is_closed()
    }

    /// The capacity the channel was created with.
    pub fn capacity(&self) -> Capacity {
        self.shared.capacity
    }

    /// Number of buffered values.
    ///
    /// Values held by suspended senders are not counted; a rendezvous
    /// channel therefore always reports `0`.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no value is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of senders suspended with a value that no receiver took yet.
    pub fn waiting_senders(&self) -> usize {
        self.lock().waiting_senders()
    }

    /// Number of receivers suspended on this channel.
    pub fn waiting_receivers(&self) -> usize {
        self.lock().waiting_receivers()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // No user code runs under this lock, so a poisoned state is still
        // consistent.
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();

        f.debug_struct("Channel")
            .field("capacity", &self.shared.capacity)
            .field("len", &state.len())
            .field("closed", &state.is_closed())
            .finish()
    }
}
