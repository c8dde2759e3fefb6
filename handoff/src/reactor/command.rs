use super::TimerEntry;

/// Messages sent to the reactor thread.
pub(crate) enum Command {
    /// Wake a task once a deadline passes.
    SetTimer(TimerEntry),

    /// Stop the reactor loop. Pending timers are dropped without firing.
    Shutdown,
}
