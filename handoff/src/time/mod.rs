//! Time utilities driven by the runtime's timer thread.
//!
//! - [`sleep`] waits for a duration,
//! - [`timeout`] bounds how long a future may run, dropping it when the
//!   deadline passes. Applied to a channel operation this cancels it.

mod sleep;
mod timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Elapsed, Timeout, timeout};
