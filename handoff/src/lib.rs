//! # handoff
//!
//! **handoff** hands values from one task to another through channels that
//! suspend the sending and receiving tasks instead of blocking threads.
//!
//! A [`Channel`](sync::Channel) is either a **rendezvous** channel, where
//! every send waits for the receive that takes its value, or a **bounded**
//! channel buffering up to `N` values. Any number of tasks may send and
//! receive on the same channel; values are delivered in send order, each
//! to exactly one receiver. Closing the channel wakes everybody: buffered
//! values can still be drained, then receivers observe
//! [`ChannelClosed`](sync::ChannelClosed).
//!
//! The crate ships the runtime its tasks run on:
//!
//! - a **work-stealing scheduler** with [`task::spawn`], [`task::JoinHandle`]
//!   and [`task::JoinSet`],
//! - **timers** ([`time::sleep`], [`time::timeout`]) driven by a dedicated
//!   timer thread,
//! - **macros**: `#[handoff::main]`, `#[handoff::test]`, [`join!`] and
//!   [`select!`].
//!
//! Channels also work from plain OS threads through their `*_blocking`
//! methods, and any other executor can poll their futures.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use handoff::sync::Channel;
//! use handoff::task;
//!
//! #[handoff::main]
//! async fn main() {
//!     let channel = Channel::rendezvous();
//!
//!     let sender = channel.clone();
//!     let producer = task::spawn(async move {
//!         for value in [10, 20, 30] {
//!             sender.send(value).await.unwrap();
//!         }
//!         sender.close();
//!     });
//!
//!     while let Ok(value) = channel.receive().await {
//!         println!("received {value}");
//!     }
//!
//!     producer.await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`sync`]: channels and their errors
//! - [`task`]: spawning and joining tasks
//! - [`time`]: sleep and timeout

mod reactor;
mod runtime;
mod utils;

pub mod sync;
pub mod time;

pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;

pub use handoff_macros::*;
