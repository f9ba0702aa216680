use std::f64::consts::TAU;
use std::fs::File;
use std::io::BufReader;

use byteorder::{LittleEndian, ReadBytesExt};
use rstest::*;

use crate::prelude::{ChannelMeasurement, Config, ObservablesEngine, TimeConverter};
use crate::tests::{epoch_marker, gps_l1_measurement, init_logger, FS};

const N_OUT: usize = 4;
const N_EPOCHS: usize = 100;
const RECORD_DOUBLES: usize = 7;

/// Samples per 20 ms update interval.
const SAMPLES_PER_EPOCH: u64 = FS / 50;

fn expected_record(m: &ChannelMeasurement) -> [f64; RECORD_DOUBLES] {
    [
        m.rx_time,
        m.tow_at_current_symbol_ms as f64,
        m.carrier_doppler_hz,
        m.carrier_phase_rads / TAU,
        m.pseudorange_m,
        m.prn as f64,
        if m.flag_valid_pseudorange { 1.0 } else { 0.0 },
    ]
}

/// Runs the engine for [N_EPOCHS] epochs with one active channel and
/// returns everything it emitted.
fn run_dumping_engine(cfg: Config) -> Vec<Vec<ChannelMeasurement>> {
    let mut engine = ObservablesEngine::new(cfg, N_OUT, TimeConverter::new());
    let mut emitted = Vec::with_capacity(N_EPOCHS);

    for epoch in 0..N_EPOCHS as u64 {
        let mut m = gps_l1_measurement(0, epoch * SAMPLES_PER_EPOCH, 604_500_000 + 20 * epoch as u32);
        m.carrier_doppler_hz = 1000.0 + epoch as f64;
        engine.submit(m);
        emitted.push(engine.epoch_tick(&epoch_marker(epoch * SAMPLES_PER_EPOCH + 4_000)));
    }

    engine.shutdown();
    emitted
}

#[rstest]
fn dump_round_trip_is_bit_exact() {
    init_logger();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observables.dat");

    let cfg = Config {
        dump: true,
        dump_filename: path.to_string_lossy().into_owned(),
        ..Default::default()
    };
    let emitted = run_dumping_engine(cfg);

    let expected_len = (N_EPOCHS * N_OUT * RECORD_DOUBLES * 8) as u64;
    assert_eq!(std::fs::metadata(&path).unwrap().len(), expected_len);

    let mut reader = BufReader::new(File::open(&path).unwrap());
    for outputs in &emitted {
        for m in outputs {
            for expected in expected_record(m) {
                let value = reader.read_f64::<LittleEndian>().unwrap();
                assert_eq!(value.to_bits(), expected.to_bits());
            }
        }
    }
}

#[rstest]
fn matrix_export_transposes_the_log() {
    init_logger();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observables.dat");

    let cfg = Config {
        dump: true,
        dump_mat: true,
        dump_filename: path.to_string_lossy().into_owned(),
        ..Default::default()
    };
    let emitted = run_dumping_engine(cfg);

    let mat_path = dir.path().join("observables.mat");
    let expected_len = (RECORD_DOUBLES * N_OUT * N_EPOCHS * 8) as u64;
    assert_eq!(std::fs::metadata(&mat_path).unwrap().len(), expected_len);

    // Variable-major blocks; within one block, epochs outer and
    // channels inner.
    let mut reader = BufReader::new(File::open(&mat_path).unwrap());
    for var in 0..RECORD_DOUBLES {
        for outputs in &emitted {
            for m in outputs {
                let value = reader.read_f64::<LittleEndian>().unwrap();
                assert_eq!(value.to_bits(), expected_record(m)[var].to_bits());
            }
        }
    }
}
