//! Synchronization primitives for handoff.
//!
//! The central primitive is [`Channel`], a rendezvous or bounded channel
//! for handing values from one task to another.
//!
//! ## Design notes
//!
//! - Channels do not spawn threads and do not track task lifetimes.
//! - Tasks that cannot make progress are suspended and woken when the
//!   channel changes; OS threads can use the `*_blocking` variants and are
//!   parked instead.
//! - The channel state sits behind a short-lived lock that is never held
//!   across a suspension point or while waking other tasks.

mod channel;

pub use channel::{
    Capacity, Channel, ChannelBuilder, ChannelClosed, ConfigError, ReceiveFuture,
    SendError, SendFuture, TryRecvError, TrySendError,
};
