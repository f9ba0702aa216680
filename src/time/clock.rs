//! Clock identities.

use std::fmt;

/// Reserved instance identifier naming the system clock of a family:
/// the global reference every other clock of that family follows.
pub const SYSTEM_CLOCK: u32 = u32::MAX;

/// Satellite constellation tag, using the RINEX system characters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GnssSystem {
    /// BeiDou (`'C'`)
    BeiDou,
    /// Galileo (`'E'`)
    Galileo,
    /// GPS (`'G'`)
    Gps,
    /// IRNSS / NavIC (`'I'`)
    Irnss,
    /// QZSS (`'J'`)
    Qzss,
    /// GLONASS (`'R'`)
    Glonass,
    /// SBAS augmentations (`'S'`)
    Sbas,
}

impl GnssSystem {
    /// Constellation for a RINEX system character, if recognised.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Self::BeiDou),
            'E' => Some(Self::Galileo),
            'G' => Some(Self::Gps),
            'I' => Some(Self::Irnss),
            'J' => Some(Self::Qzss),
            'R' => Some(Self::Glonass),
            'S' => Some(Self::Sbas),
            _ => None,
        }
    }

    /// The RINEX system character.
    pub fn to_char(self) -> char {
        match self {
            Self::BeiDou => 'C',
            Self::Galileo => 'E',
            Self::Gps => 'G',
            Self::Irnss => 'I',
            Self::Qzss => 'J',
            Self::Glonass => 'R',
            Self::Sbas => 'S',
        }
    }
}

/// Family of reference clocks an [crate::prelude::Instant] may be
/// expressed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClockSystem {
    /// Free running receiver clock (a sample counter).
    Receiver,
    Gps,
    Galileo,
    Glonass,
    BeiDou,
    Irnss,
    Qzss,
    Sbas,
    Utc,
    Unix,
    Ntp,
    Tai,
}

impl ClockSystem {
    /// True when the family counts leap seconds, like UTC does.
    /// GNSS time scales are monotonic, GLONASS excepted.
    pub fn keeps_leap_seconds(&self) -> bool {
        matches!(self, Self::Glonass | Self::Utc | Self::Unix | Self::Ntp)
    }
}

impl From<GnssSystem> for ClockSystem {
    fn from(sys: GnssSystem) -> Self {
        match sys {
            GnssSystem::BeiDou => Self::BeiDou,
            GnssSystem::Galileo => Self::Galileo,
            GnssSystem::Gps => Self::Gps,
            GnssSystem::Irnss => Self::Irnss,
            GnssSystem::Qzss => Self::Qzss,
            GnssSystem::Glonass => Self::Glonass,
            GnssSystem::Sbas => Self::Sbas,
        }
    }
}

/// Identity of one clock: the family it measures time in plus an
/// instance identifier. [SYSTEM_CLOCK] names the family reference;
/// any other value names a specific hardware or software clock,
/// receiver #0 or receiver #1 for example.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClockId {
    system: ClockSystem,
    id: u32,
}

impl ClockId {
    /// Clock identity from family and instance.
    pub fn new(system: ClockSystem, id: u32) -> Self {
        Self { system, id }
    }

    /// Identity of a specific clock of a GNSS constellation.
    pub fn gnss(system: GnssSystem, id: u32) -> Self {
        Self::new(system.into(), id)
    }

    /// Identity of the system clock of a GNSS constellation.
    pub fn gnss_system(system: GnssSystem) -> Self {
        Self::gnss(system, SYSTEM_CLOCK)
    }

    /// The UTC system clock.
    pub fn utc() -> Self {
        Self::new(ClockSystem::Utc, SYSTEM_CLOCK)
    }

    /// The Unix system clock.
    pub fn unix() -> Self {
        Self::new(ClockSystem::Unix, SYSTEM_CLOCK)
    }

    /// The NTP system clock.
    pub fn ntp() -> Self {
        Self::new(ClockSystem::Ntp, SYSTEM_CLOCK)
    }

    /// The TAI system clock.
    pub fn tai() -> Self {
        Self::new(ClockSystem::Tai, SYSTEM_CLOCK)
    }

    /// A free running receiver clock.
    pub fn receiver(id: u32) -> Self {
        Self::new(ClockSystem::Receiver, id)
    }

    /// The clock family.
    pub fn system(&self) -> ClockSystem {
        self.system
    }

    /// The instance identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// True for the clock of a satellite constellation.
    pub fn is_gnss(&self) -> bool {
        matches!(
            self.system,
            ClockSystem::Gps
                | ClockSystem::Galileo
                | ClockSystem::Glonass
                | ClockSystem::BeiDou
                | ClockSystem::Irnss
                | ClockSystem::Qzss
                | ClockSystem::Sbas
        )
    }

    /// True when this names the family reference rather than a
    /// specific clock.
    pub fn is_system_clock(&self) -> bool {
        self.id == SYSTEM_CLOCK
    }

    /// True when the family counts leap seconds.
    pub fn keeps_leap_seconds(&self) -> bool {
        self.system.keeps_leap_seconds()
    }

    /// Two identities are compatible when their families match:
    /// durations between them are then meaningful without conversion.
    pub fn is_compatible_with(&self, rhs: ClockId) -> bool {
        self.system == rhs.system
    }
}

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self.system {
            ClockSystem::Receiver => "Rx.",
            ClockSystem::Gps => "GPS",
            ClockSystem::Galileo => "Galileo",
            ClockSystem::Glonass => "Glonass",
            ClockSystem::BeiDou => "BeiDou",
            ClockSystem::Irnss => "IRNSS",
            ClockSystem::Qzss => "QZSS",
            ClockSystem::Sbas => "SBAS",
            ClockSystem::Utc => "UTC",
            ClockSystem::Unix => "Unix",
            ClockSystem::Ntp => "NTP",
            ClockSystem::Tai => "TAI",
        };
        write!(f, "{}", name)?;
        if !self.is_system_clock() {
            write!(f, " {}", self.id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{ClockId, GnssSystem};

    #[test]
    fn predicates() {
        let gps = ClockId::gnss_system(GnssSystem::Gps);
        assert!(gps.is_gnss());
        assert!(gps.is_system_clock());
        assert!(!gps.keeps_leap_seconds());

        let rx0 = ClockId::receiver(0);
        assert!(!rx0.is_gnss());
        assert!(!rx0.is_system_clock());
        assert!(rx0.is_compatible_with(ClockId::receiver(1)));
        assert!(!rx0.is_compatible_with(gps));

        assert!(ClockId::utc().keeps_leap_seconds());
        assert!(ClockId::unix().keeps_leap_seconds());
        assert!(ClockId::ntp().keeps_leap_seconds());
        assert!(ClockId::gnss_system(GnssSystem::Glonass).keeps_leap_seconds());
        assert!(!ClockId::tai().keeps_leap_seconds());
    }

    #[test]
    fn system_characters_round_trip() {
        for sys in [
            GnssSystem::BeiDou,
            GnssSystem::Galileo,
            GnssSystem::Gps,
            GnssSystem::Irnss,
            GnssSystem::Qzss,
            GnssSystem::Glonass,
            GnssSystem::Sbas,
        ] {
            assert_eq!(GnssSystem::from_char(sys.to_char()), Some(sys));
        }
        assert_eq!(GnssSystem::from_char('X'), None);
    }

    #[test]
    fn formatting() {
        assert_eq!(ClockId::gnss_system(GnssSystem::Gps).to_string(), "GPS");
        assert_eq!(ClockId::receiver(0).to_string(), "Rx. 0");
        assert_eq!(ClockId::utc().to_string(), "UTC");
        assert_eq!(ClockId::gnss(GnssSystem::Galileo, 3).to_string(), "Galileo 3");
    }
}
