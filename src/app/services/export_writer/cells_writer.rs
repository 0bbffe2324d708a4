//! Cleaned per-cell CSV writer
//!
//! This module writes the parsed observation sequence back out as a cleaned
//! CSV with decomposed site and sector columns, ready for spreadsheet or
//! dataframe consumption.

use std::path::{Path, PathBuf};

use tracing::{info, trace};

use super::config::{WriterConfig, WritingStats};
use super::sink::ObservationSink;
use crate::app::models::CellObservation;
use crate::{Error, Result};

/// Column order of the cleaned cells output
const CELLS_HEADER: [&str; 16] = [
    "ID",
    "Radio",
    "MCC",
    "MNC",
    "TAC",
    "PCI",
    "Lon",
    "Lat",
    "Range",
    "Samples",
    "Changeable",
    "Created",
    "Updated",
    "AverageSignal",
    "SiteID",
    "SectorID",
];

/// Writer for the cleaned per-cell CSV
///
/// Rows carry a 1-based running `ID` assigned at write time; the country
/// restriction from [`WriterConfig::mcc_filter`] is applied here, with
/// skipped rows counted in the statistics.
pub struct CellsCsvWriter {
    /// Output file path
    output_path: PathBuf,
    /// Writer configuration
    config: WriterConfig,
    /// Writing statistics
    stats: WritingStats,
}

impl CellsCsvWriter {
    /// Create a new cells writer
    ///
    /// The output file is not created until the write call.
    pub fn new(output_path: &Path, config: WriterConfig) -> Result<Self> {
        config.validate().map_err(Error::configuration)?;

        Ok(Self {
            output_path: output_path.to_path_buf(),
            config,
            stats: WritingStats::default(),
        })
    }

    /// Get current writing statistics
    pub fn stats(&self) -> &WritingStats {
        &self.stats
    }

    /// Get the output file path
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn format_coordinate(&self, value: f64) -> String {
        format!("{:.*}", self.config.coordinate_precision, value)
    }

    fn writing_error(&self, message: &str, source: csv::Error) -> Error {
        Error::csv_writing(
            self.output_path.display().to_string(),
            message,
            Some(source),
        )
    }
}

impl ObservationSink for CellsCsvWriter {
    fn write_observations(&mut self, observations: &[CellObservation]) -> Result<usize> {
        info!(
            "Writing {} observations to {}",
            observations.len(),
            self.output_path.display()
        );

        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::io("Failed to create output directory".to_string(), e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .from_path(&self.output_path)
            .map_err(|e| self.writing_error("Failed to create output file", e))?;

        writer
            .write_record(CELLS_HEADER)
            .map_err(|e| self.writing_error("Failed to write header", e))?;

        let mut row_id: usize = 0;
        for observation in observations {
            if let Some(mcc) = self.config.mcc_filter {
                if observation.mcc != mcc {
                    self.stats.rows_filtered += 1;
                    trace!("Filtered observation with mcc {}", observation.mcc);
                    continue;
                }
            }

            row_id += 1;
            writer
                .write_record(&[
                    row_id.to_string(),
                    observation.radio.clone(),
                    observation.mcc.to_string(),
                    observation.mnc.to_string(),
                    observation.tac.to_string(),
                    observation.pci.to_string(),
                    self.format_coordinate(observation.lon),
                    self.format_coordinate(observation.lat),
                    observation.range.to_string(),
                    observation.samples.to_string(),
                    observation.changeable.to_string(),
                    observation.created.to_string(),
                    observation.updated.to_string(),
                    observation.average_signal.to_string(),
                    observation.site_id.to_string(),
                    observation.sector_id.to_string(),
                ])
                .map_err(|e| self.writing_error("Failed to write observation row", e))?;
        }

        writer
            .flush()
            .map_err(|e| Error::io("Failed to flush cells output".to_string(), e))?;

        self.stats.rows_written = row_id;
        if let Ok(metadata) = std::fs::metadata(&self.output_path) {
            self.stats.bytes_written = metadata.len() as usize;
        }

        info!(
            "Cells output complete: {} rows written, {} filtered ({})",
            self.stats.rows_written,
            self.stats.rows_filtered,
            WritingStats::format_bytes(self.stats.bytes_written)
        );

        Ok(row_id)
    }
}
