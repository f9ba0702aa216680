#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod carrier;
mod cfg;
mod constants;
mod dump;
mod engine;
mod error;
mod measurement;
mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::carrier::carrier_frequency;
    pub use crate::cfg::Config;
    pub use crate::constants::SPEED_OF_LIGHT_M_S;
    pub use crate::dump::DumpSink;
    pub use crate::engine::{ObservablesEngine, ObservablesMsg, ObservablesPort};
    pub use crate::error::Error;
    pub use crate::measurement::ChannelMeasurement;
    pub use crate::time::{
        ClockId, ClockSystem, Duration, GnssSystem, Instant, TimeConverter, SYSTEM_CLOCK,
    };
}
