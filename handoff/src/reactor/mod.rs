//! Timer reactor.
//!
//! The reactor runs on its own thread, next to the executor. It owns the
//! pending timer deadlines and wakes the tasks waiting on them. The
//! executor and the timer futures talk to it through [`Command`]s.
//!
//! [`Command`]: command::Command

mod core;
mod timer;

pub(crate) mod command;

pub(crate) use self::core::{Reactor, ReactorHandle};
pub(crate) use timer::TimerEntry;
