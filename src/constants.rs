//! Physical and time constants.

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Seconds per hour
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Seconds per day
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Seconds per week
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Femtoseconds per second: the internal resolution of [crate::prelude::Duration]
pub const FEMTOS_PER_SECOND: i64 = 1_000_000_000_000_000;
