//! Channel error types.

use std::fmt;

use thiserror::Error;

/// The channel has been closed and cannot serve the operation.
///
/// Returned by [`receive`](super::Channel::receive) once the channel is
/// closed and every buffered item has been drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("channel closed")]
pub struct ChannelClosed;

/// A value could not be sent because the channel is closed.
///
/// The unsent value is handed back to the caller.
#[derive(PartialEq, Eq, Error)]
#[error("sending on a closed channel")]
pub struct SendError<T>(pub T);

impl<T> SendError<T> {
    /// Returns the value that could not be sent.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendError").finish_non_exhaustive()
    }
}

impl<T> From<SendError<T>> for ChannelClosed {
    fn from(_: SendError<T>) -> Self {
        ChannelClosed
    }
}

/// Error returned by [`try_send`](super::Channel::try_send).
#[derive(PartialEq, Eq, Error)]
pub enum TrySendError<T> {
    /// No buffer slot is free. A rendezvous channel is always full.
    #[error("channel is full")]
    Full(T),

    /// The channel is closed.
    #[error("sending on a closed channel")]
    Closed(T),
}

impl<T> TrySendError<T> {
    /// Returns the value that could not be sent.
    pub fn into_inner(self) -> T {
        match self {
            TrySendError::Full(value) | TrySendError::Closed(value) => value,
        }
    }

    /// Returns `true` if the send failed because the channel is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, TrySendError::Closed(_))
    }
}

impl<T> fmt::Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => f.write_str("Full(..)"),
            TrySendError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> From<SendError<T>> for TrySendError<T> {
    fn from(err: SendError<T>) -> Self {
        TrySendError::Closed(err.0)
    }
}

/// Error returned by [`try_receive`](super::Channel::try_receive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryRecvError {
    /// Nothing is buffered and no sender is waiting.
    #[error("channel is empty")]
    Empty,

    /// The channel is closed and drained.
    #[error("channel closed")]
    Closed,
}

impl From<ChannelClosed> for TryRecvError {
    fn from(_: ChannelClosed) -> Self {
        TryRecvError::Closed
    }
}

/// Invalid channel configuration, reported at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A capacity below zero was requested.
    #[error("invalid configuration: capacity must not be negative (got {0})")]
    NegativeCapacity(i64),

    /// The capacity string is neither `rendezvous` nor an integer.
    #[error("invalid configuration: cannot parse capacity from {0:?}")]
    Unparsable(String),
}
