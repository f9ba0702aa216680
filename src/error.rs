use thiserror::Error;

use crate::time::ClockId;

#[derive(Debug, Error)]
pub enum Error {
    /// Arithmetic or ordering between two [crate::prelude::Instant]s
    /// that live on different clocks. This is a caller bug: there is no
    /// meaningful answer without a conversion first.
    #[error("incompatible clocks: {0} and {1}")]
    IncompatibleClocks(ClockId, ClockId),

    /// Conversion requested for a clock with no epoch offset entry.
    #[error("unknown clock: {0}")]
    UnknownClock(ClockId),

    /// Conversion from a receiver clock whose epoch has not been
    /// registered yet. Recoverable: the observables engine uses this to
    /// trigger its bootstrap path.
    #[error("receiver epoch not set: {0}")]
    ReceiverEpochUnset(ClockId),

    /// Leap second transitions can only be appended after the current
    /// table head; earlier inserts are rejected without state change.
    #[error("leap second entry predates the table head")]
    LeapSecondOutOfOrder,

    /// Side band correction that does not resolve to a finite number
    /// of seconds. Logged and dropped at the port boundary.
    #[error("bad clock correction message")]
    BadCorrectionMessage,

    #[error("dump i/o: {0}")]
    DumpIo(#[from] std::io::Error),
}
