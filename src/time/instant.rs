//! Clock-tagged instants.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::error::Error;
use crate::time::{ClockId, ClockSystem, Duration, GnssSystem};

/// A point in time: a [Duration] elapsed since the epoch of a named
/// clock.
///
/// Instants only compare and subtract against instants on the same
/// [ClockId]. Mixing clocks is a caller bug: the `-` operator fails
/// fast, [Instant::checked_duration_since] is the recoverable form,
/// and `partial_cmp` answers `None` rather than a misleading `false`.
/// Use [crate::prelude::TimeConverter] to move an instant onto another
/// clock first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Instant {
    clock: ClockId,
    since_epoch: Duration,
}

/// Days between 1970-01-01 and year/month/day of the proleptic
/// Gregorian calendar (Howard Hinnant's civil calendar algorithm).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// Inverse of [days_from_civil]: (year, month, day) of a day count
/// relative to 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = z.div_euclid(146097);
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month as u32, day as u32)
}

impl Instant {
    /// Instant at `since_epoch` past the epoch of `clock`.
    pub fn new(clock: ClockId, since_epoch: Duration) -> Self {
        Self { clock, since_epoch }
    }

    /// The epoch of `clock` itself.
    pub fn epoch_of(clock: ClockId) -> Self {
        Self::new(clock, Duration::ZERO)
    }

    /// Instant on the system clock of a GNSS constellation.
    pub fn from_gnss(system: GnssSystem, since_epoch: Duration) -> Self {
        Self::new(ClockId::gnss_system(system), since_epoch)
    }

    /// Instant on the system clock of a GNSS constellation, from week
    /// number and time of week in seconds.
    pub fn from_gnss_tow(system: GnssSystem, week: i64, tow_seconds: f64) -> Self {
        Self::from_gnss(
            system,
            Duration::from_weeks(week) + Duration::from_seconds(tow_seconds),
        )
    }

    /// Instant on a free running receiver clock.
    pub fn from_receiver(since_epoch: Duration, instance: u32) -> Self {
        Self::new(ClockId::receiver(instance), since_epoch)
    }

    /// Instant on a free running receiver clock, from its sample
    /// counter and sampling rate.
    pub fn from_sample_count(sample_count: i64, rate_hz: f64, instance: u32) -> Self {
        Self::from_receiver(Duration::from_ticks(sample_count, rate_hz), instance)
    }

    /// Current instant on the Unix system clock, from the host's
    /// high resolution clock.
    pub fn now_unix() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::new(
            ClockId::unix(),
            Duration::from_integer_seconds(now.as_secs() as i64)
                + Duration::from_nanoseconds(now.subsec_nanos() as f64),
        )
    }

    /// Current instant on the UTC system clock.
    pub fn now_utc() -> Self {
        let unix = Self::now_unix();
        Self::new(ClockId::utc(), unix.since_epoch)
    }

    /// Instant on the UTC system clock from a calendar date and time
    /// of day (month and day are 1 indexed).
    ///
    /// The conversion is pure calendar arithmetic, independent of the
    /// host time zone: 1980-01-01 00:00:00 maps to exactly
    /// 315 532 800 s past the Unix epoch on every platform.
    pub fn from_utc(year: i64, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let days = days_from_civil(year, month as i64, day as i64);
        let seconds = days * SECONDS_PER_DAY
            + hour as i64 * SECONDS_PER_HOUR
            + minute as i64 * 60
            + second as i64;
        Self::new(ClockId::utc(), Duration::from_integer_seconds(seconds))
    }

    /// The clock this instant lives on.
    pub fn clock(&self) -> ClockId {
        self.clock
    }

    /// Elapsed time since the clock's epoch.
    pub fn since_epoch(&self) -> Duration {
        self.since_epoch
    }

    /// The week number since the clock's epoch.
    pub fn week(&self) -> i64 {
        self.since_epoch.as_weeks()
    }

    /// Time elapsed since the start of the current week.
    pub fn time_of_week(&self) -> Duration {
        self.since_epoch - Duration::from_weeks(self.week())
    }

    /// Elapsed time since `earlier`, on the same clock.
    pub fn checked_duration_since(&self, earlier: Instant) -> Result<Duration, Error> {
        if self.clock != earlier.clock {
            return Err(Error::IncompatibleClocks(self.clock, earlier.clock));
        }
        Ok(self.since_epoch - earlier.since_epoch)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;
    fn add(self, rhs: Duration) -> Instant {
        Instant::new(self.clock, self.since_epoch + rhs)
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.since_epoch += rhs;
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;
    fn sub(self, rhs: Duration) -> Instant {
        Instant::new(self.clock, self.since_epoch - rhs)
    }
}

impl SubAssign<Duration> for Instant {
    fn sub_assign(&mut self, rhs: Duration) {
        self.since_epoch -= rhs;
    }
}

impl Sub for Instant {
    type Output = Duration;

    /// Panics when the operands live on different clocks; use
    /// [Instant::checked_duration_since] to recover instead.
    fn sub(self, rhs: Instant) -> Duration {
        match self.checked_duration_since(rhs) {
            Ok(dt) => dt,
            Err(e) => panic!("{}", e),
        }
    }
}

impl PartialOrd for Instant {
    /// Instants on different clocks are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.clock != other.clock {
            return None;
        }
        Some(self.since_epoch.cmp(&other.since_epoch))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.clock.system() {
            ClockSystem::Utc | ClockSystem::Unix => {
                // Calendar rendering, both families share the epoch.
                let total = self.since_epoch.total_seconds();
                let days = total.div_euclid(SECONDS_PER_DAY);
                let sod = total.rem_euclid(SECONDS_PER_DAY);
                let (year, month, day) = civil_from_days(days);
                write!(
                    f,
                    "{} {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    self.clock,
                    year,
                    month,
                    day,
                    sod / SECONDS_PER_HOUR,
                    (sod % SECONDS_PER_HOUR) / 60,
                    sod % 60,
                )
            }
            _ if self.clock.is_gnss() => {
                write!(
                    f,
                    "{} Week: {} TOW: {}",
                    self.clock,
                    self.week(),
                    self.time_of_week()
                )
            }
            _ => write!(f, "{} {}", self.clock, self.since_epoch),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Instant;
    use crate::error::Error;
    use crate::time::{ClockId, Duration, GnssSystem};

    #[test]
    fn week_and_time_of_week() {
        let t = Instant::from_gnss(
            GnssSystem::Gps,
            Duration::from_weeks(2048) + Duration::from_seconds(604500.0),
        );
        assert_eq!(t.week(), 2048);
        assert_eq!(t.time_of_week().as_seconds(), 604500.0);
    }

    #[test]
    fn utc_calendar_is_timezone_independent() {
        let t = Instant::from_utc(1980, 1, 1, 0, 0, 0);
        assert_eq!(t.since_epoch(), Duration::from_integer_seconds(315_532_800));

        let t = Instant::from_utc(1970, 1, 1, 0, 0, 0);
        assert_eq!(t.since_epoch(), Duration::ZERO);

        let t = Instant::from_utc(1999, 8, 22, 0, 0, 0);
        assert_eq!(t.since_epoch(), Duration::from_integer_seconds(935_280_000));
    }

    #[test]
    fn receiver_instants_follow_the_sample_counter() {
        let fs_exact: i64 = 40_000_000;
        let fs = fs_exact as f64;
        let sample_counter = fs_exact * 3600 * 24 * 7 * 51;

        let mut t = Instant::from_sample_count(sample_counter, fs, 0);
        t += Duration::from_ticks(101, fs);

        assert_eq!(t.week(), 51);
        assert!((t.time_of_week().as_seconds() - 101.0 / fs).abs() < 1.0E-9);
    }

    #[test]
    fn cross_clock_arithmetic_is_rejected() {
        let gps = Instant::from_gnss(GnssSystem::Gps, Duration::from_weeks(1));
        let gal = Instant::from_gnss(GnssSystem::Galileo, Duration::from_weeks(1));

        assert!(matches!(
            gps.checked_duration_since(gal),
            Err(Error::IncompatibleClocks(_, _))
        ));
        assert_eq!(gps.partial_cmp(&gal), None);
        assert_ne!(gps, gal);
    }

    #[test]
    #[should_panic]
    fn cross_clock_subtraction_panics() {
        let gps = Instant::from_gnss(GnssSystem::Gps, Duration::from_weeks(1));
        let rx = Instant::from_receiver(Duration::ZERO, 0);
        let _ = gps - rx;
    }

    #[test]
    fn same_clock_ordering() {
        let t0 = Instant::from_gnss_tow(GnssSystem::Gps, 2048, 0.0);
        let t1 = t0 + Duration::from_nanoseconds(1.0);
        assert!(t0 < t1);
        assert_eq!(t1 - t0, Duration::from_nanoseconds(1.0));
    }

    #[test]
    fn formatting() {
        let t = Instant::from_utc(2006, 1, 1, 0, 0, 0);
        assert_eq!(t.to_string(), "UTC 2006-01-01 00:00:00");

        let t = Instant::from_gnss_tow(GnssSystem::Gps, 2048, 604500.0);
        assert_eq!(t.to_string(), "GPS Week: 2048 TOW: 604500 s");

        let t = Instant::from_receiver(Duration::from_seconds(2.5), 0);
        assert_eq!(t.to_string(), "Rx. 0 2.5 s");

        let _ = Instant::new(ClockId::tai(), Duration::ZERO).to_string();
    }
}
