//! Binary epoch log.

use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use itertools::iproduct;
use log::info;

use crate::error::Error;
use crate::measurement::ChannelMeasurement;

/// Doubles written per channel per epoch.
const RECORD_DOUBLES: usize = 7;

/// Append-only binary log of emitted epochs.
///
/// Per epoch, for each output channel in ascending order, seven
/// consecutive little-endian `f64`: receive time [s], TOW [ms],
/// Doppler [Hz], carrier phase [cycles], pseudorange [m], PRN and the
/// valid-pseudorange flag as 0.0 or 1.0. No header, no padding.
pub struct DumpSink {
    writer: BufWriter<File>,
    path: PathBuf,
    n_out: usize,
    dump_mat: bool,
}

impl DumpSink {
    /// Opens (and truncates) the log file once.
    pub fn create(path: &Path, n_out: usize, dump_mat: bool) -> Result<Self, Error> {
        let writer = BufWriter::new(File::create(path)?);
        info!("observables dump enabled, log file: {}", path.display());
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            n_out,
            dump_mat,
        })
    }

    /// Appends one epoch, one record per output channel.
    pub fn write_epoch(&mut self, records: &[ChannelMeasurement]) -> Result<(), Error> {
        for m in records {
            self.writer.write_f64::<LittleEndian>(m.rx_time)?;
            self.writer
                .write_f64::<LittleEndian>(m.tow_at_current_symbol_ms as f64)?;
            self.writer.write_f64::<LittleEndian>(m.carrier_doppler_hz)?;
            self.writer
                .write_f64::<LittleEndian>(m.carrier_phase_rads / TAU)?;
            self.writer.write_f64::<LittleEndian>(m.pseudorange_m)?;
            self.writer.write_f64::<LittleEndian>(m.prn as f64)?;
            self.writer
                .write_f64::<LittleEndian>(if m.flag_valid_pseudorange { 1.0 } else { 0.0 })?;
        }
        Ok(())
    }

    /// Flush and close the log; when requested, re-read it and write
    /// the transposed matrix file alongside.
    pub fn close(mut self) -> Result<(), Error> {
        self.writer.flush()?;
        if self.dump_mat {
            self.export_matrix()?;
        }
        Ok(())
    }

    /// Matrix export: the epoch-major log becomes seven variable-major
    /// blocks, each `n_out` rows of one value per epoch, written as
    /// raw little-endian doubles to the `.mat` sibling of the log.
    fn export_matrix(&self) -> Result<(), Error> {
        let epoch_bytes = RECORD_DOUBLES * 8 * self.n_out;
        let n_epochs = std::fs::metadata(&self.path)?.len() as usize / epoch_bytes;

        info!(
            "generating matrix file for {} ({} epochs)",
            self.path.display(),
            n_epochs
        );

        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut table = vec![vec![[0.0_f64; RECORD_DOUBLES]; n_epochs]; self.n_out];
        for epoch in 0..n_epochs {
            for chan in 0..self.n_out {
                for var in 0..RECORD_DOUBLES {
                    table[chan][epoch][var] = reader.read_f64::<LittleEndian>()?;
                }
            }
        }

        let mut filename = self.path.to_string_lossy().into_owned();
        if filename.len() > 4 {
            filename.truncate(filename.len() - 4);
        }
        filename.push_str(".mat");

        let mut writer = BufWriter::new(File::create(&filename)?);
        for var in 0..RECORD_DOUBLES {
            for (epoch, chan) in iproduct!(0..n_epochs, 0..self.n_out) {
                writer.write_f64::<LittleEndian>(table[chan][epoch][var])?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
