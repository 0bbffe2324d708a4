//! Per-site estimate CSV writer
//!
//! This module writes the aggregated site position estimates, one row per
//! site in canonical key order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use super::config::{WriterConfig, WritingStats};
use super::sink::EstimateSink;
use crate::app::models::{EstimatedSite, SiteKey};
use crate::{Error, Result};

/// Column order of the site estimate output
const SITES_HEADER: [&str; 5] = ["MCC", "MNC", "Lon", "Lat", "SiteID"];

/// Writer for the per-site estimate CSV
///
/// Rows are sorted by `(mcc, mnc, site_id)` so repeat runs over the same
/// input produce byte-identical output.
pub struct SitesCsvWriter {
    /// Output file path
    output_path: PathBuf,
    /// Writer configuration
    config: WriterConfig,
    /// Writing statistics
    stats: WritingStats,
}

impl SitesCsvWriter {
    /// Create a new sites writer
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

impl EstimateSink for SitesCsvWriter {
    fn write_estimates(&mut self, sites: &HashMap<SiteKey, EstimatedSite>) -> Result<usize> {
        info!(
            "Writing {} site estimates to {}",
            sites.len(),
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
            .write_record(SITES_HEADER)
            .map_err(|e| self.writing_error("Failed to write header", e))?;

        // Canonical ordering: the input mapping iterates in arbitrary order
        let mut entries: Vec<(&SiteKey, &EstimatedSite)> = sites.iter().collect();
        entries.sort_by_key(|(key, _)| **key);

        for (_, site) in &entries {
            writer
                .write_record(&[
                    site.mcc.to_string(),
                    site.mnc.to_string(),
                    self.format_coordinate(site.lon),
                    self.format_coordinate(site.lat),
                    site.site_id.to_string(),
                ])
                .map_err(|e| self.writing_error("Failed to write site row", e))?;
        }

        writer
            .flush()
            .map_err(|e| Error::io("Failed to flush sites output".to_string(), e))?;

        self.stats.rows_written = entries.len();
        if let Ok(metadata) = std::fs::metadata(&self.output_path) {
            self.stats.bytes_written = metadata.len() as usize;
        }

        info!(
            "Sites output complete: {} rows written ({})",
            self.stats.rows_written,
            WritingStats::format_bytes(self.stats.bytes_written)
        );

        Ok(entries.len())
    }
}
