//! Configuration and statistics for CSV writer operations
//!
//! This module provides the shared writer configuration and the statistics
//! tracking used by both output writers.

use crate::constants::{DEFAULT_COORDINATE_PRECISION, MAX_COORDINATE_PRECISION};

/// Configuration for output CSV generation
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Decimal places for rendered coordinates
    /// Default: 6 (about 11cm of longitude at the equator)
    pub coordinate_precision: usize,

    /// Restrict cell rows to one country code
    /// Default: None (write every observation); only the cells writer
    /// applies this, estimates are written for every site
    pub mcc_filter: Option<u16>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
            mcc_filter: None,
        }
    }
}

impl WriterConfig {
    /// Create a new WriterConfig with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set coordinate precision in decimal places
    pub fn with_coordinate_precision(mut self, precision: usize) -> Self {
        self.coordinate_precision = precision;
        self
    }

    /// Restrict cell rows to the given country code
    pub fn with_mcc_filter(mut self, mcc: Option<u16>) -> Self {
        self.mcc_filter = mcc;
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.coordinate_precision > MAX_COORDINATE_PRECISION {
            return Err(format!(
                "Coordinate precision must be at most {} decimal places, got {}",
                MAX_COORDINATE_PRECISION, self.coordinate_precision
            ));
        }

        if let Some(mcc) = self.mcc_filter {
            if mcc == 0 || mcc > 999 {
                return Err(format!(
                    "Country code filter must be between 1 and 999, got {}",
                    mcc
                ));
            }
        }

        Ok(())
    }
}

/// Writing statistics for progress reporting and diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WritingStats {
    /// Total number of rows written, header excluded
    pub rows_written: usize,
    /// Rows dropped by the country code restriction
    pub rows_filtered: usize,
    /// Total bytes written to storage
    pub bytes_written: usize,
}

impl WritingStats {
    /// Create new empty writing statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows offered to the writer
    pub fn rows_seen(&self) -> usize {
        self.rows_written + self.rows_filtered
    }

    /// Percentage of offered rows dropped by filtering
    pub fn filter_rate(&self) -> f64 {
        let seen = self.rows_seen();
        if seen == 0 {
            0.0
        } else {
            (self.rows_filtered as f64 / seen as f64) * 100.0
        }
    }

    /// Format bytes in human-readable format
    pub fn format_bytes(bytes: usize) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Format statistics as human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "WritingStats {{ rows: {}, filtered: {}, size: {} }}",
            self.rows_written,
            self.rows_filtered,
            Self::format_bytes(self.bytes_written)
        )
    }
}
