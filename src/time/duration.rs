//! Exact multi-scale durations.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::constants::{
    FEMTOS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_WEEK,
};

const FEMTOS_PER_SECOND_I128: i128 = FEMTOS_PER_SECOND as i128;

/// Days of a leap-free calendar year, used by epoch derivations.
const DAYS_PER_YEAR: i64 = 365;

/// Signed duration held as whole seconds plus a femtosecond (10⁻¹⁵ s)
/// remainder.
///
/// The representation is exact: arithmetic never rounds, the range
/// exceeds ±2.9 × 10¹¹ years and the resolution is one femtosecond,
/// which is what lets week-scale spans and sub-nanosecond corrections
/// coexist in the same value. The remainder is kept normalised in
/// `[0, 10¹⁵)`, so a negative half second is `(-1 s, +5 × 10¹⁴ fs)`
/// and the derived equality and ordering are exact on the pair.
///
/// Constructors taking `f64` inherit the precision of their argument;
/// use the integer constructors when exactness matters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration {
    seconds: i64,
    femtos: i64,
}

impl Duration {
    /// The null duration.
    pub const ZERO: Duration = Duration {
        seconds: 0,
        femtos: 0,
    };

    fn normalized(seconds: i64, femtos: i64) -> Self {
        let carry = femtos.div_euclid(FEMTOS_PER_SECOND);
        Self {
            seconds: seconds + carry,
            femtos: femtos - carry * FEMTOS_PER_SECOND,
        }
    }

    fn total_femtos(&self) -> i128 {
        self.seconds as i128 * FEMTOS_PER_SECOND_I128 + self.femtos as i128
    }

    fn from_total_femtos(total: i128) -> Self {
        Self {
            seconds: total.div_euclid(FEMTOS_PER_SECOND_I128) as i64,
            femtos: total.rem_euclid(FEMTOS_PER_SECOND_I128) as i64,
        }
    }

    /// Duration of `years` leap-free (365 day) calendar years.
    pub fn from_years(years: i64) -> Self {
        Self::from_days(years * DAYS_PER_YEAR)
    }

    /// Duration of `weeks` whole weeks.
    pub fn from_weeks(weeks: i64) -> Self {
        Self::normalized(weeks * SECONDS_PER_WEEK, 0)
    }

    /// Duration of `days` whole days.
    pub fn from_days(days: i64) -> Self {
        Self::normalized(days * SECONDS_PER_DAY, 0)
    }

    /// Duration of `hours` whole hours.
    pub fn from_hours(hours: i64) -> Self {
        Self::normalized(hours * SECONDS_PER_HOUR, 0)
    }

    /// Exact duration of a whole number of seconds.
    pub fn from_integer_seconds(seconds: i64) -> Self {
        Self::normalized(seconds, 0)
    }

    /// Duration of `seconds` seconds. The fractional part carries the
    /// precision of the `f64` argument, not the femtosecond resolution
    /// of the representation.
    pub fn from_seconds(seconds: f64) -> Self {
        let whole = seconds.floor();
        let femtos = ((seconds - whole) * FEMTOS_PER_SECOND as f64) as i64;
        Self::normalized(whole as i64, femtos)
    }

    /// Duration of `ms` milliseconds.
    pub fn from_milliseconds(ms: f64) -> Self {
        Self::from_seconds(ms * 1.0E-3)
    }

    /// Duration of `us` microseconds.
    pub fn from_microseconds(us: f64) -> Self {
        Self::from_seconds(us * 1.0E-6)
    }

    /// Duration of `ns` nanoseconds.
    pub fn from_nanoseconds(ns: f64) -> Self {
        Self::from_seconds(ns * 1.0E-9)
    }

    /// Duration of `ticks` counts of a clock running at `rate_hz`,
    /// which is treated as an exact integer number of ticks per second.
    /// The whole-second quotient is exact; the sub-second residue is
    /// converted through an `f64`, bounding its error below one tick.
    pub fn from_ticks(ticks: i64, rate_hz: f64) -> Self {
        let rate = rate_hz as i64;
        let whole = Self::from_integer_seconds(ticks.div_euclid(rate));
        let residue = ticks.rem_euclid(rate) as f64 / rate as f64;
        whole + Self::from_seconds(residue)
    }

    /// The duration in seconds.
    ///
    /// This loses precision once the span exceeds the 52 bit mantissa
    /// of an `f64`; callers that need exactness stay in [Duration]
    /// arithmetic instead.
    pub fn as_seconds(&self) -> f64 {
        self.seconds as f64 + self.femtos as f64 / FEMTOS_PER_SECOND as f64
    }

    /// The whole-second part, rounded towards negative infinity.
    pub fn total_seconds(&self) -> i64 {
        self.seconds
    }

    /// The whole number of weeks, rounded towards negative infinity.
    pub fn as_weeks(&self) -> i64 {
        self.seconds.div_euclid(SECONDS_PER_WEEK)
    }

    /// The duration as a count of ticks of a clock running at
    /// `rate_hz` (an integer rate), rounded to the nearest tick.
    pub fn as_ticks(&self, rate_hz: f64) -> i64 {
        let rate = rate_hz as i64;
        let sub = (self.femtos as i128 * rate as i128 + FEMTOS_PER_SECOND_I128 / 2)
            .div_euclid(FEMTOS_PER_SECOND_I128);
        self.seconds * rate + sub as i64
    }

    /// Remainder of `self` modulo a positive `modulus`: the unique
    /// value in `[0, modulus)` such that subtracting it from `self`
    /// leaves a whole multiple of `modulus`.
    pub fn remainder_mod(&self, modulus: Duration) -> Duration {
        Self::from_total_femtos(self.total_femtos().rem_euclid(modulus.total_femtos()))
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Self::normalized(self.seconds + rhs.seconds, self.femtos + rhs.femtos)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Self::normalized(self.seconds - rhs.seconds, self.femtos - rhs.femtos)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl Neg for Duration {
    type Output = Duration;
    fn neg(self) -> Duration {
        Duration::ZERO - self
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;
    fn mul(self, n: i64) -> Duration {
        // The sub-second product needs 128 bits before it is folded
        // back into the seconds field.
        let femtos = self.femtos as i128 * n as i128;
        let carry = femtos.div_euclid(FEMTOS_PER_SECOND_I128);
        Duration {
            seconds: (self.seconds as i128 * n as i128 + carry) as i64,
            femtos: femtos.rem_euclid(FEMTOS_PER_SECOND_I128) as i64,
        }
    }
}

impl Mul<Duration> for i64 {
    type Output = Duration;
    fn mul(self, rhs: Duration) -> Duration {
        rhs * self
    }
}

impl Div<i64> for Duration {
    type Output = Duration;
    fn div(self, n: i64) -> Duration {
        Duration::from_total_femtos(self.total_femtos().div_euclid(n as i128))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let weeks = self.as_weeks();
        if weeks > 0 {
            write!(f, "{} Week{} ", weeks, if weeks > 1 { "s" } else { "" })?;
        }
        let tow = self.seconds.rem_euclid(SECONDS_PER_WEEK) as f64
            + self.femtos as f64 / FEMTOS_PER_SECOND as f64;
        write!(f, "{} s", tow)
    }
}

#[cfg(test)]
mod test {
    use super::Duration;

    #[test]
    fn unit_equivalences() {
        assert_eq!(Duration::from_weeks(1), Duration::from_seconds(604800.0));
        assert_eq!(Duration::from_days(1), Duration::from_seconds(86400.0));
        assert_eq!(Duration::from_hours(1), Duration::from_seconds(3600.0));
        assert_eq!(
            Duration::from_milliseconds(1000.0),
            Duration::from_seconds(1.0)
        );
        assert_eq!(
            Duration::from_microseconds(1_000_000.0),
            Duration::from_seconds(1.0)
        );
        assert_eq!(
            Duration::from_nanoseconds(1_000_000_000.0),
            Duration::from_seconds(1.0)
        );
    }

    #[test]
    fn wide_spans_keep_precision() {
        let dt1 = Duration::from_weeks(2048);
        let dt2 = Duration::from_nanoseconds(1.0);
        let dt3 = dt1 + dt2;

        assert_eq!(dt3.as_weeks(), 2048);
        assert_eq!(dt3 - dt1, Duration::from_nanoseconds(1.0));
    }

    #[test]
    fn propagates_by_multiplication() {
        let dt = Duration::from_milliseconds(1.0) * 1001;
        assert_eq!(
            dt,
            Duration::from_seconds(1.0) + Duration::from_milliseconds(1.0)
        );

        let dt = dt * 1001;
        assert_eq!(
            dt,
            Duration::from_seconds(1001.0) + Duration::from_milliseconds(1001.0)
        );
    }

    #[test]
    fn division_inverts_scaling() {
        let dt = Duration::from_milliseconds(1.0);
        assert_eq!((dt * 1000) / 1000, dt);
        assert_eq!(Duration::from_seconds(1.0) / 1000, dt);
    }

    #[test]
    fn remainders() {
        let t = Duration::from_weeks(2048)
            + Duration::from_seconds(4500.0)
            + Duration::from_milliseconds(23.0)
            + Duration::from_nanoseconds(100.0);

        assert_eq!(
            t.remainder_mod(Duration::from_weeks(1)),
            Duration::from_seconds(4500.0)
                + Duration::from_milliseconds(23.0)
                + Duration::from_nanoseconds(100.0)
        );
        assert_eq!(
            t.remainder_mod(Duration::from_seconds(1.0)),
            Duration::from_milliseconds(23.0) + Duration::from_nanoseconds(100.0)
        );
        assert_eq!(
            t.remainder_mod(Duration::from_milliseconds(1.0)),
            Duration::from_nanoseconds(100.0)
        );
        assert_eq!(
            t.remainder_mod(Duration::from_nanoseconds(1.0)),
            Duration::ZERO
        );
    }

    #[test]
    fn remainder_of_negative_values_is_non_negative() {
        let t = -(Duration::from_seconds(1.0) + Duration::from_milliseconds(500.0));
        let r = t.remainder_mod(Duration::from_seconds(1.0));

        assert_eq!(r, Duration::from_milliseconds(500.0));
        assert_eq!(t - r, Duration::from_seconds(-2.0));
    }

    #[test]
    fn clock_ticks_round_trip() {
        let fs_exact: i64 = 40_000_000;
        let fs = fs_exact as f64;
        let sample_counter = fs_exact * 3600 * 24 * 7 * 51;

        let dt = Duration::from_ticks(sample_counter, fs);
        assert_eq!(dt.as_weeks(), 51);
        assert_eq!(dt.as_ticks(fs), sample_counter);

        let dt = dt + Duration::from_ticks(1, fs);
        assert_eq!(dt.as_ticks(fs), sample_counter + 1);
    }

    #[test]
    fn negative_values_stay_ordered() {
        let minus_half = Duration::from_seconds(-0.5);
        assert!(minus_half < Duration::ZERO);
        assert!(-Duration::from_nanoseconds(1.0) < minus_half + Duration::from_seconds(0.5));
        assert_eq!(minus_half + Duration::from_seconds(0.5), Duration::ZERO);
        assert_eq!(-(-minus_half), minus_half);
    }

    #[test]
    fn formatting() {
        let dt = Duration::from_weeks(2) + Duration::from_seconds(1.5);
        assert_eq!(dt.to_string(), "2 Weeks 1.5 s");
        assert_eq!(Duration::from_seconds(12.0).to_string(), "12 s");
    }
}
