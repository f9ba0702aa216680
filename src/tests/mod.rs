use crate::prelude::ChannelMeasurement;

mod dump;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sampling rate shared by the engine scenarios [Hz].
pub(crate) const FS: u64 = 4_000_000;

/// A GPS L1 tracking measurement with a decoded telemetry word.
pub(crate) fn gps_l1_measurement(
    channel_id: u32,
    sample_counter: u64,
    tow_ms: u32,
) -> ChannelMeasurement {
    ChannelMeasurement {
        channel_id,
        system: 'G',
        prn: 17,
        signal: ['1', 'C'],
        week_at_current_symbol: 2048,
        tow_at_current_symbol_ms: tow_ms,
        code_phase_samples: 0.0,
        tracking_sample_counter: sample_counter,
        fs: FS,
        flag_valid_word: true,
        flag_valid_acquisition: true,
        correlation_length_ms: 20,
        ..Default::default()
    }
}

/// The synthetic record the signal source clock emits on the epoch
/// channel.
pub(crate) fn epoch_marker(sample_counter: u64) -> ChannelMeasurement {
    ChannelMeasurement {
        tracking_sample_counter: sample_counter,
        fs: FS,
        ..Default::default()
    }
}
