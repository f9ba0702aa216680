//! Multi-scale time: exact durations, clock identities, instants and
//! cross-clock conversion.

mod clock;
mod converter;
mod duration;
mod instant;

pub use clock::{ClockId, ClockSystem, GnssSystem, SYSTEM_CLOCK};
pub use converter::TimeConverter;
pub use duration::Duration;
pub use instant::Instant;
