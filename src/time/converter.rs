//! Cross-clock conversion.

use log::debug;

use crate::error::Error;
use crate::time::{ClockId, ClockSystem, Duration, GnssSystem, Instant};

/// Historical leap second transitions, as leap-free seconds past the
/// NTP epoch (1900-01-01 00:00:00 UTC), oldest first. The first entry
/// is 1972-01-01, where the cumulative TAI-UTC offset reached 10 s.
const LEAP_EPOCHS: [i64; 28] = [
    2272060800, 2287785600, 2303683200, 2335219200, 2366755200, 2398291200, 2429913600, 2461449600,
    2492985600, 2524521600, 2571782400, 2603318400, 2634854400, 2698012800, 2776982400, 2840140800,
    2871676800, 2918937600, 2950473600, 2982009600, 3029443200, 3076704000, 3124137600, 3345062400,
    3439756800, 3550089600, 3644697600, 3692217600,
];

/// Cumulative leap count in force from the oldest tabulated
/// transition onwards.
const FIRST_CUMULATIVE_LEAP: i64 = 10;

/// One leap second transition: the transition instant on the leap-free
/// NTP axis, and the cumulative count in force from it onwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct LeapSecond {
    ntp_epoch: Duration,
    cumulative: i64,
}

/// Converts [Instant]s between clock families, accounting for epoch
/// offsets and leap seconds.
///
/// Every epoch offset is the leap-free duration from the NTP epoch
/// (1900-01-01 00:00:00 UTC) to the clock's own epoch. The tables are
/// seeded with the GNSS and civil families at construction; receiver
/// clocks join once [TimeConverter::set_receiver_epoch] registers
/// them. Converters carry no global state: whoever owns one decides
/// how it is shared.
#[derive(Debug, Clone)]
pub struct TimeConverter {
    epoch_offsets: Vec<(ClockId, Duration)>,
    /// Descending ntp_epoch, most recent transition first.
    leap_seconds: Vec<LeapSecond>,
}

impl Default for TimeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeConverter {
    /// A converter seeded with the GNSS and civil clock families and
    /// the historical leap second table.
    pub fn new() -> Self {
        // Unix epoch is 1970-01-01, 70 years past NTP of which 17 are
        // leap years.
        let unix = Duration::from_years(70) + Duration::from_days(17);
        // GPS epoch is 1980-01-06: 10 years (2 leap) plus 5 days past
        // Unix, offset by the 19 s TAI-GPS constant.
        let gps = unix
            + Duration::from_years(10)
            + Duration::from_days(2)
            + Duration::from_days(5)
            + Duration::from_integer_seconds(19);
        // Galileo system time starts 1024 weeks after GPS, on the GPS
        // weekly epoch rather than the UTC one.
        let galileo = gps + Duration::from_weeks(1024);
        // BeiDou epoch is 2006-01-01, 14 extra leap seconds in.
        let beidou = gps + Duration::from_years(26) + Duration::from_days(7)
            - Duration::from_days(5)
            + Duration::from_integer_seconds(14);

        let epoch_offsets = vec![
            (ClockId::gnss_system(GnssSystem::Gps), gps),
            (ClockId::gnss_system(GnssSystem::Galileo), galileo),
            // The GLONASS origin is ill defined; GPS's serves.
            (ClockId::gnss_system(GnssSystem::Glonass), gps),
            (ClockId::gnss_system(GnssSystem::BeiDou), beidou),
            (ClockId::unix(), unix),
            (ClockId::utc(), unix),
            (ClockId::ntp(), Duration::ZERO),
            (ClockId::tai(), Duration::ZERO),
        ];

        let leap_seconds = LEAP_EPOCHS
            .iter()
            .enumerate()
            .rev()
            .map(|(nth, &ntp)| LeapSecond {
                ntp_epoch: Duration::from_integer_seconds(ntp),
                cumulative: FIRST_CUMULATIVE_LEAP + nth as i64,
            })
            .collect();

        Self {
            epoch_offsets,
            leap_seconds,
        }
    }

    fn offset_of(&self, clock: ClockId) -> Result<Duration, Error> {
        self.epoch_offsets
            .iter()
            .find(|(c, _)| *c == clock)
            .map(|(_, offset)| *offset)
            .ok_or_else(|| {
                if clock.system() == ClockSystem::Receiver {
                    Error::ReceiverEpochUnset(clock)
                } else {
                    Error::UnknownClock(clock)
                }
            })
    }

    /// Epoch offset shift without any leap adjustment.
    fn convert_no_leaps(&self, t: Instant, out_clock: ClockId) -> Result<Instant, Error> {
        if t.clock() == out_clock {
            return Ok(t);
        }
        let epoch_delta = self.offset_of(t.clock())? - self.offset_of(out_clock)?;
        Ok(Instant::new(out_clock, t.since_epoch() + epoch_delta))
    }

    /// Leap count in force at an instant on the leap-free NTP axis.
    /// Queries before the earliest tabulated transition see none.
    fn leaps_at(&self, since_ntp_epoch: Duration) -> Option<i64> {
        self.leap_seconds
            .iter()
            .find(|entry| entry.ntp_epoch < since_ntp_epoch)
            .map(|entry| entry.cumulative)
    }

    /// Express `t` on `out_clock`.
    ///
    /// The returned instant names the same physical moment: the epoch
    /// offset between the two clocks is applied, and when exactly one
    /// side counts leap seconds, the cumulative leap count in force at
    /// `t` as well. Conversion from a receiver clock fails with
    /// [Error::ReceiverEpochUnset] until its epoch is registered.
    pub fn convert(&self, t: Instant, out_clock: ClockId) -> Result<Instant, Error> {
        let converted = self.convert_no_leaps(t, out_clock)?;

        if t.clock().keeps_leap_seconds() == out_clock.keeps_leap_seconds() {
            return Ok(converted);
        }

        let ntp = self.convert_no_leaps(t, ClockId::ntp())?;
        match self.leaps_at(ntp.since_epoch()) {
            None => Ok(converted),
            Some(leaps) => {
                let leaps = Duration::from_integer_seconds(leaps);
                if out_clock.keeps_leap_seconds() {
                    Ok(converted - leaps)
                } else {
                    Ok(converted + leaps)
                }
            }
        }
    }

    /// Record a leap second transition at `leap_epoch`, after which
    /// `cumulative` leap seconds are in force.
    ///
    /// The transition must not predate the current table head;
    /// announcing it again at the same instant replaces the head
    /// entry. Out of order inserts leave the table untouched.
    pub fn add_leap_second_at(&mut self, leap_epoch: Instant, cumulative: i64) -> Result<(), Error> {
        let ntp_epoch = self.convert(leap_epoch, ClockId::ntp())?.since_epoch();

        if let Some(head) = self.leap_seconds.first() {
            if ntp_epoch < head.ntp_epoch {
                return Err(Error::LeapSecondOutOfOrder);
            }
            if ntp_epoch == head.ntp_epoch {
                self.leap_seconds[0] = LeapSecond {
                    ntp_epoch,
                    cumulative,
                };
                return Ok(());
            }
        }
        self.leap_seconds.insert(
            0,
            LeapSecond {
                ntp_epoch,
                cumulative,
            },
        );
        Ok(())
    }

    /// Define the epoch of receiver clock `instance`: its duration
    /// zero now corresponds to `epoch`. A previous definition is
    /// overwritten.
    pub fn set_receiver_epoch(&mut self, instance: u32, epoch: Instant) -> Result<(), Error> {
        let clock = ClockId::receiver(instance);
        let tai = self.convert(epoch, ClockId::tai())?;

        match self.epoch_offsets.iter_mut().find(|(c, _)| *c == clock) {
            Some(entry) => {
                debug!("{} epoch overwritten: {}", clock, epoch);
                entry.1 = tai.since_epoch();
            }
            None => self.epoch_offsets.push((clock, tai.since_epoch())),
        }
        Ok(())
    }
}
