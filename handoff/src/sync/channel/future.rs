use super::Channel;
use super::error::{ChannelClosed, SendError};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by [`Channel::send`].
///
/// Resolves once the value is buffered or, for a rendezvous channel (or a
/// full buffer), once a receiver has taken it.
///
/// Dropping the future before it resolves cancels the send: the value is
/// dropped with it and the channel is left as if the send never happened.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct SendFuture<'a, T> {
    channel: &'a Channel<T>,

    /// The value, until it is buffered or parked.
    value: Option<T>,

    /// Slab key while parked as a waiting sender.
    key: Option<usize>,
}

impl<'a, T> SendFuture<'a, T> {
    pub(super) fn new(channel: &'a Channel<T>, value: T) -> Self {
        Self {
            channel,
            value: Some(value),
            key: None,
        }
    }
}

// The value is never pinned; it only moves in and out of the channel state.
impl<T> Unpin for SendFuture<'_, T> {}

impl<T> Future for SendFuture<'_, T> {
    type Output = Result<(), SendError<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this.channel.lock();

        if let Some(key) = this.key {
            let poll = state.poll_sender(key, cx.waker());
            if poll.is_ready() {
                this.key = None;
            }
            return poll;
        }

        let value = this
            .value
            .take()
            .expect("`SendFuture` polled after completion");

        if state.is_closed() {
            return Poll::Ready(Err(SendError(value)));
        }

        match state.push(value) {
            Ok(receiver) => {
                drop(state);

                if let Some(waker) = receiver {
                    waker.wake();
                }
                Poll::Ready(Ok(()))
            }
            Err(value) => {
                this.key = Some(state.park_sender(value, cx.waker()));
                let receiver = state.notify_receiver();
                drop(state);

                if let Some(waker) = receiver {
                    waker.wake();
                }
                Poll::Pending
            }
        }
    }
}

impl<T> Drop for SendFuture<'_, T> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };

        let unsent = self.channel.lock().forget_sender(key);
        if unsent.is_some() {
            log::trace!("channel: send cancelled while parked");
        }
    }
}

/// Future returned by [`Channel::receive`].
///
/// Resolves with the next value in send order, or with [`ChannelClosed`]
/// once the channel is closed and drained.
///
/// Dropping the future before it resolves cancels the receive without
/// consuming anything.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ReceiveFuture<'a, T> {
    channel: &'a Channel<T>,

    /// Slab key while parked as a waiting receiver.
    key: Option<usize>,
}

impl<'a, T> ReceiveFuture<'a, T> {
    pub(super) fn new(channel: &'a Channel<T>) -> Self {
        Self { channel, key: None }
    }
}

impl<T> Future for ReceiveFuture<'_, T> {
    type Output = Result<T, ChannelClosed>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this.channel.lock();

        if let Some((value, sender)) = state.take() {
            if let Some(key) = this.key.take() {
                state.forget_receiver(key);
            }
            drop(state);

            if let Some(waker) = sender {
                waker.wake();
            }
            return Poll::Ready(Ok(value));
        }

        if state.is_closed() {
            if let Some(key) = this.key.take() {
                state.forget_receiver(key);
            }
            return Poll::Ready(Err(ChannelClosed));
        }

        this.key = Some(state.park_receiver(this.key, cx.waker()));
        Poll::Pending
    }
}

impl<T> Drop for ReceiveFuture<'_, T> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };

        let next = self.channel.lock().cancel_receiver(key);

        if let Some(waker) = next {
            log::trace!("channel: receive cancelled, passing wake-up on");
            waker.wake();
        }
    }
}
