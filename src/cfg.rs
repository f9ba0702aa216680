//! Engine configuration.

#[cfg(feature = "serde")]
use serde::Deserialize;

fn default_rate_hz() -> f64 {
    50.0
}

fn default_dump_filename() -> String {
    "./observables.dat".to_string()
}

fn default_nominal_transit_ms() -> u32 {
    70
}

/// [crate::prelude::ObservablesEngine] configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Output epoch rate [Hz]. The 50 Hz default emits one
    /// consolidated record every 20 ms.
    #[cfg_attr(feature = "serde", serde(default = "default_rate_hz"))]
    pub rate_hz: f64,
    /// Enable the binary epoch log.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dump: bool,
    /// Write the post processed matrix file when the engine shuts
    /// down. Only meaningful together with `dump`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dump_mat: bool,
    /// Path of the binary epoch log. The matrix file swaps the last
    /// four characters of this path for `.mat`.
    #[cfg_attr(feature = "serde", serde(default = "default_dump_filename"))]
    pub dump_filename: String,
    /// Identity tag of the free running receiver clock.
    #[cfg_attr(feature = "serde", serde(default))]
    pub receiver_instance_id: u32,
    /// Assumed signal transit time when bootstrapping the receiver
    /// epoch from the first valid telemetry word [ms].
    #[cfg_attr(feature = "serde", serde(default = "default_nominal_transit_ms"))]
    pub nominal_transit_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            dump: false,
            dump_mat: false,
            dump_filename: default_dump_filename(),
            receiver_instance_id: 0,
            nominal_transit_ms: default_nominal_transit_ms(),
        }
    }
}
