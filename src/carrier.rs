//! Carrier frequency table.

/// L1 / E1 centre frequency [Hz] (GPS, Galileo, SBAS, QZSS)
pub const FREQ1: f64 = 1.575_42E9;

/// L2 centre frequency [Hz] (GPS, QZSS)
pub const FREQ2: f64 = 1.227_60E9;

/// L5 / E5a centre frequency [Hz] (GPS, Galileo, SBAS, QZSS, IRNSS)
pub const FREQ5: f64 = 1.176_45E9;

/// E6 / LEX centre frequency [Hz] (Galileo, QZSS)
pub const FREQ6: f64 = 1.278_75E9;

/// E5b centre frequency [Hz] (Galileo)
pub const FREQ7: f64 = 1.207_140E9;

/// E5a+b centre frequency [Hz] (Galileo)
pub const FREQ8: f64 = 1.191_795E9;

/// S band centre frequency [Hz] (IRNSS)
pub const FREQ9: f64 = 2.492_028E9;

/// G1 base frequency [Hz] (GLONASS FDMA)
pub const FREQ1_GLO: f64 = 1.602_00E9;

/// G1 channel spacing [Hz]
pub const DFRQ1_GLO: f64 = 0.562_5E6;

/// G2 base frequency [Hz] (GLONASS FDMA)
pub const FREQ2_GLO: f64 = 1.246_00E9;

/// G2 channel spacing [Hz]
pub const DFRQ2_GLO: f64 = 0.437_5E6;

/// G3 centre frequency [Hz] (GLONASS CDMA)
pub const FREQ3_GLO: f64 = 1.202_025E9;

/// B1 centre frequency [Hz] (BeiDou)
pub const FREQ1_BDS: f64 = 1.561_098E9;

/// B2 centre frequency [Hz] (BeiDou)
pub const FREQ2_BDS: f64 = 1.207_140E9;

/// B3 centre frequency [Hz] (BeiDou)
pub const FREQ3_BDS: f64 = 1.268_52E9;

/// Carrier frequency in Hz for a constellation (RINEX system
/// character) and two character band code.
///
/// GLONASS G1 and G2 are FDMA: the result is the band base plus
/// `frequency_number` channel spacings. Unrecognised combinations
/// yield -1.0.
pub fn carrier_frequency(system: char, signal: [char; 2], frequency_number: i32) -> f64 {
    match (system, signal[0]) {
        // GLONASS
        ('R', '1') => FREQ1_GLO + frequency_number as f64 * DFRQ1_GLO,
        ('R', '2') => FREQ2_GLO + frequency_number as f64 * DFRQ2_GLO,
        ('R', '3') => FREQ3_GLO,
        // BeiDou
        ('C', '2') => FREQ1_BDS,
        ('C', '7') => FREQ2_BDS,
        ('C', '6') => FREQ3_BDS,
        // GPS
        ('G', '1') => FREQ1,
        ('G', '2') => FREQ2,
        ('G', '5') => FREQ5,
        // Galileo
        ('E', '1') => FREQ1,
        ('E', '5') => FREQ5,
        ('E', '7') => FREQ7,
        ('E', '8') => FREQ8,
        ('E', '6') => FREQ6,
        // SBAS
        ('S', '1') => FREQ1,
        ('S', '5') => FREQ5,
        // QZSS
        ('J', '1') => FREQ1,
        ('J', '2') => FREQ2,
        ('J', '5') => FREQ5,
        ('J', '6') => FREQ6,
        // IRNSS
        ('I', '5') => FREQ5,
        ('I', '9') => FREQ9,
        _ => -1.0,
    }
}
