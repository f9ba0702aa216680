//! Per-channel tracking measurement record.

/// One measurement reported by a tracking channel, and the record the
/// engine emits back, augmented with the derived observables.
///
/// A record with `prn == 0` is the empty pattern: it marks a channel
/// with nothing to report at this epoch.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ChannelMeasurement {
    /// Index of the producing channel.
    pub channel_id: u32,
    /// Constellation tag, as a RINEX system character.
    pub system: char,
    /// Satellite number within the constellation; 0 marks an empty
    /// record.
    pub prn: u32,
    /// Two character signal band code, `['1', 'C']` for example.
    pub signal: [char; 2],
    /// Carrier Doppler shift [Hz].
    pub carrier_doppler_hz: f64,
    /// Accumulated carrier phase [rad].
    pub carrier_phase_rads: f64,
    /// Code phase offset at the reported symbol [samples].
    pub code_phase_samples: f64,
    /// Free running sample count at the reported symbol. Monotonic:
    /// this is the receiver clock.
    pub tracking_sample_counter: u64,
    /// Front end sampling rate [Hz].
    pub fs: u64,
    /// Time of week at the reported symbol [ms].
    pub tow_at_current_symbol_ms: u32,
    /// Week number at the reported symbol.
    pub week_at_current_symbol: u32,
    /// The telemetry decoder has a word: week and TOW are trustworthy.
    pub flag_valid_word: bool,
    /// The acquisition stage confirmed this satellite.
    pub flag_valid_acquisition: bool,
    /// Output: receive time in the measurement's GNSS frame
    /// [s of week].
    pub rx_time: f64,
    /// Output: pseudorange [m].
    pub pseudorange_m: f64,
    /// Output: `pseudorange_m` is usable.
    pub flag_valid_pseudorange: bool,
    /// Coherent correlation span [ms]; 0 marks an uninitialised
    /// record.
    pub correlation_length_ms: u32,
}

impl ChannelMeasurement {
    /// The empty pattern for one output channel.
    pub fn empty(channel_id: u32) -> Self {
        Self {
            channel_id,
            ..Self::default()
        }
    }

    /// Back to the empty pattern, preserving the channel id.
    pub fn reset(&mut self) {
        *self = Self::empty(self.channel_id);
    }
}

#[cfg(test)]
mod test {
    use super::ChannelMeasurement;

    #[test]
    fn reset_preserves_the_channel_id() {
        let mut m = ChannelMeasurement {
            channel_id: 3,
            system: 'G',
            prn: 17,
            flag_valid_word: true,
            flag_valid_pseudorange: true,
            pseudorange_m: 2.1E7,
            ..Default::default()
        };

        m.reset();

        assert_eq!(m, ChannelMeasurement::empty(3));
        assert_eq!(m.channel_id, 3);
        assert_eq!(m.prn, 0);
        assert!(!m.flag_valid_word);
        assert!(!m.flag_valid_pseudorange);
    }
}
