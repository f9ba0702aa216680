//! Receiver-synchronous observable generation.

use std::f64::consts::TAU;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{info, warn};

use crate::carrier::carrier_frequency;
use crate::cfg::Config;
use crate::constants::SPEED_OF_LIGHT_M_S;
use crate::dump::DumpSink;
use crate::error::Error;
use crate::measurement::ChannelMeasurement;
use crate::time::{ClockId, Duration, GnssSystem, Instant, TimeConverter};

/// Side band message accepted by the engine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ObservablesMsg {
    /// Receiver clock correction from the PVT solver [s]. Non finite
    /// values are logged and dropped at the port boundary.
    ClockCorrection { seconds: f64 },
}

/// State shared between the epoch path and the message port.
struct Shared {
    converter: TimeConverter,
    /// Offset between the receiver sample clock and the output epoch
    /// grid of the GNSS frames. Captured at bootstrap, retimed on
    /// every clock correction.
    rx_epoch_offset: Duration,
    receiver_time: Instant,
}

/// Fuses per-channel tracking measurements, streaming at their native
/// correlation cadence, into one consolidated record per channel per
/// output epoch.
///
/// Tracking measurements enter through [ObservablesEngine::submit];
/// only the most recent record per channel is pending at any time. An
/// epoch marker from the signal source clock drives
/// [ObservablesEngine::epoch_tick], which aligns every pending
/// measurement to the epoch boundary and derives pseudorange, carrier
/// phase and Doppler observables. While the receiver-to-GNSS mapping
/// is unknown, the first valid telemetry word bootstraps it under a
/// nominal transit time assumption.
///
/// Clock corrections computed downstream come back through
/// [ObservablesEngine::message_port]; the handler and the epoch path
/// serialise on one internal mutex, so a correction landing during
/// epoch `i` takes effect no later than epoch `i + 1`.
pub struct ObservablesEngine {
    cfg: Config,
    n_out: usize,
    rx_id: u32,
    current: Vec<ChannelMeasurement>,
    shared: Arc<Mutex<Shared>>,
    dump: Option<DumpSink>,
}

/// Cloneable handle on the `pvt_to_observables` side band, safe to
/// drive from a thread other than the one running the epoch path.
#[derive(Clone)]
pub struct ObservablesPort {
    shared: Arc<Mutex<Shared>>,
    rate_hz: f64,
    rx_id: u32,
}

impl ObservablesPort {
    /// Deliver one side band message.
    pub fn send(&self, msg: ObservablesMsg) {
        let mut shared = lock(&self.shared);
        apply_correction(&mut shared, msg, self.rate_hz, self.rx_id);
    }
}

fn lock(shared: &Arc<Mutex<Shared>>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn apply_correction(shared: &mut Shared, msg: ObservablesMsg, rate_hz: f64, rx_id: u32) {
    let ObservablesMsg::ClockCorrection { seconds } = msg;
    if !seconds.is_finite() {
        warn!("{}", Error::BadCorrectionMessage);
        return;
    }

    info!("applying clock correction: {} s", seconds);

    // The correction moves the receiver clock within every system
    // frame: Tsys = Trx + Toffset, so Toffset absorbs it.
    let zero_rx = Instant::from_receiver(Duration::ZERO, rx_id);
    match shared
        .converter
        .convert(zero_rx, ClockId::gnss_system(GnssSystem::Gps))
    {
        Ok(gps_epoch) => {
            let new_epoch = gps_epoch + Duration::from_seconds(seconds);
            info!("updating receiver epoch to {}", new_epoch);
            if let Err(e) = shared.converter.set_receiver_epoch(rx_id, new_epoch) {
                warn!("receiver epoch update failed: {}", e);
            } else {
                info!(
                    "receiver time {} corresponds to {}",
                    shared.receiver_time,
                    new_epoch + shared.receiver_time.since_epoch()
                );
            }
        }
        Err(e) => warn!("clock correction before receiver epoch is known: {}", e),
    }

    // Keep the measurement epoch on the output grid.
    shared.rx_epoch_offset = (shared.rx_epoch_offset + Duration::from_seconds(seconds))
        .remainder_mod(Duration::from_seconds(1.0 / rate_hz));
    info!("updated rx epoch offset to {}", shared.rx_epoch_offset);
}

impl ObservablesEngine {
    /// New engine emitting `n_out` output channels, owning `converter`
    /// for its receiver-to-GNSS mapping.
    ///
    /// When the configuration enables the dump and the log file cannot
    /// be opened, the failure is logged and the dump stays disabled;
    /// observable generation is never held back by diagnostics.
    pub fn new(cfg: Config, n_out: usize, converter: TimeConverter) -> Self {
        let dump = if cfg.dump {
            match DumpSink::create(Path::new(&cfg.dump_filename), n_out, cfg.dump_mat) {
                Ok(sink) => Some(sink),
                Err(e) => {
                    warn!("cannot open observables dump {}: {}", cfg.dump_filename, e);
                    None
                }
            }
        } else {
            None
        };

        let rx_id = cfg.receiver_instance_id;
        Self {
            n_out,
            rx_id,
            dump,
            current: (0..n_out)
                .map(|ch| ChannelMeasurement::empty(ch as u32))
                .collect(),
            shared: Arc::new(Mutex::new(Shared {
                converter,
                rx_epoch_offset: Duration::ZERO,
                receiver_time: Instant::from_receiver(Duration::ZERO, rx_id),
            })),
            cfg,
        }
    }

    /// Record a tracking measurement. Within one epoch, the most
    /// recent record per channel wins.
    pub fn submit(&mut self, m: ChannelMeasurement) {
        let ch = m.channel_id as usize;
        if ch >= self.n_out {
            warn!("measurement for unknown channel {} dropped", m.channel_id);
            return;
        }
        if m.correlation_length_ms == 0 {
            info!("{}: ['{}{}'] invalid obs", ch, m.system, m.prn);
        }
        self.current[ch] = m;
    }

    /// Consume an epoch marker from the signal source clock and emit
    /// one record per output channel, empty for channels with nothing
    /// pending. Pending measurements are consumed: after the tick all
    /// channels are back to the empty pattern.
    pub fn epoch_tick(&mut self, epoch: &ChannelMeasurement) -> Vec<ChannelMeasurement> {
        let mut guard = lock(&self.shared);
        let shared = &mut *guard;
        shared.receiver_time = Instant::from_sample_count(
            epoch.tracking_sample_counter as i64,
            epoch.fs as f64,
            self.rx_id,
        );

        let update_interval = Duration::from_seconds(1.0 / self.cfg.rate_hz);
        let nominal_transit = Duration::from_milliseconds(self.cfg.nominal_transit_ms as f64);

        let mut outputs = Vec::with_capacity(self.n_out);
        for m in &mut self.current {
            if m.prn == 0 {
                if m.flag_valid_word {
                    info!(
                        "odd measurement on channel {}: ['{}{}'] TOW: {} Fd: {}",
                        m.channel_id,
                        m.system,
                        m.prn,
                        m.tow_at_current_symbol_ms,
                        m.carrier_doppler_hz
                    );
                }
                outputs.push(ChannelMeasurement::empty(m.channel_id));
                continue;
            }

            let Some(system) = GnssSystem::from_char(m.system) else {
                warn!(
                    "channel {}: unknown system tag '{}'",
                    m.channel_id, m.system
                );
                outputs.push(ChannelMeasurement::empty(m.channel_id));
                continue;
            };
            let gnss_clock = ClockId::gnss_system(system);

            // Transmit instant of the reported symbol, when telemetry
            // pins down week and TOW.
            let t_tx_valid = m.flag_valid_word;
            let t_tx = Instant::from_gnss(
                system,
                Duration::from_weeks(m.week_at_current_symbol as i64)
                    + Duration::from_milliseconds(m.tow_at_current_symbol_ms as f64)
                    - Duration::from_ticks(m.code_phase_samples as i64, m.fs as f64),
            );

            let t_rx = Instant::from_sample_count(
                m.tracking_sample_counter as i64,
                m.fs as f64,
                self.rx_id,
            );

            let mut conversion = shared.converter.convert(t_rx, gnss_clock);
            if conversion.is_err() && t_tx_valid {
                conversion = bootstrap(
                    shared,
                    t_rx,
                    t_tx,
                    gnss_clock,
                    nominal_transit,
                    update_interval,
                    self.rx_id,
                );
            }

            match conversion {
                Ok(t_rx_gnss) => {
                    m.rx_time = t_rx_gnss.time_of_week().as_seconds();
                    if t_tx_valid {
                        let transit = (t_rx_gnss - t_tx).remainder_mod(Duration::from_weeks(1));
                        m.pseudorange_m = transit.as_seconds() * SPEED_OF_LIGHT_M_S;
                        m.flag_valid_pseudorange = true;
                    }
                }
                // No receiver-to-GNSS mapping: tag with the raw
                // receiver time of week.
                Err(_) => m.rx_time = t_rx.time_of_week().as_seconds(),
            }

            // Propagate to the epoch boundary along the Doppler slope.
            let dt = shared.receiver_time - (t_rx + shared.rx_epoch_offset);
            let dt_s = dt.as_seconds();
            let wavelength = SPEED_OF_LIGHT_M_S / carrier_frequency(m.system, m.signal, 0);
            let dcp = m.carrier_doppler_hz * dt_s;

            m.rx_time += dt_s;
            m.carrier_phase_rads -= TAU * dcp;
            m.pseudorange_m -= dcp * wavelength;
            m.tracking_sample_counter = (m.tracking_sample_counter as i128
                + (dt_s * m.fs as f64).round() as i128)
                .max(0) as u64;

            outputs.push(*m);
        }

        for m in &mut self.current {
            m.reset();
        }

        if let Some(mut sink) = self.dump.take() {
            match sink.write_epoch(&outputs) {
                Ok(()) => self.dump = Some(sink),
                Err(e) => warn!("observables dump write failed, dump disabled: {}", e),
            }
        }

        outputs
    }

    /// Deliver one side band message on the calling thread. Prefer
    /// [ObservablesEngine::message_port] from other threads.
    pub fn handle_message(&self, msg: ObservablesMsg) {
        let mut shared = lock(&self.shared);
        apply_correction(&mut shared, msg, self.cfg.rate_hz, self.rx_id);
    }

    /// Handle on the `pvt_to_observables` side band.
    pub fn message_port(&self) -> ObservablesPort {
        ObservablesPort {
            shared: Arc::clone(&self.shared),
            rate_hz: self.cfg.rate_hz,
            rx_id: self.rx_id,
        }
    }

    /// Current offset between the receiver sample clock and the output
    /// epoch grid.
    pub fn rx_epoch_offset(&self) -> Duration {
        lock(&self.shared).rx_epoch_offset
    }

    /// Flush and close the dump; runs the matrix export when
    /// configured. Harmless when the dump is disabled or already
    /// closed.
    pub fn shutdown(&mut self) {
        if let Some(sink) = self.dump.take() {
            if let Err(e) = sink.close() {
                warn!("closing observables dump failed: {}", e);
            }
        }
    }
}

impl Drop for ObservablesEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// First valid telemetry word, no receiver-to-GNSS mapping yet: define
/// the receiver epoch under a nominal transit time assumption, then
/// capture the offset between the sample clock and the GNSS epoch
/// grid.
fn bootstrap(
    shared: &mut Shared,
    t_rx: Instant,
    t_tx: Instant,
    gnss_clock: ClockId,
    nominal_transit: Duration,
    update_interval: Duration,
    rx_id: u32,
) -> Result<Instant, Error> {
    let t_rx_nominal = t_tx + nominal_transit;
    let rx_epoch_nominal = t_rx_nominal - t_rx.since_epoch();

    info!("setting receiver start epoch to {}", rx_epoch_nominal);
    shared.converter.set_receiver_epoch(rx_id, rx_epoch_nominal)?;

    let converted = shared.converter.convert(t_rx, gnss_clock)?;

    let dt1 = t_rx.since_epoch().remainder_mod(update_interval);
    let dt2 = t_rx_nominal.since_epoch().remainder_mod(update_interval);
    shared.rx_epoch_offset = dt2 - dt1;
    info!("setting rx epoch offset to {}", shared.rx_epoch_offset);

    Ok(converted)
}
