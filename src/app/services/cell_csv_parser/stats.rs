//! Parsing statistics and result structures for MLS export processing
//!
//! This module provides types for tracking parse outcomes, filter activity,
//! and organizing parsed results for downstream aggregation.

use serde::{Deserialize, Serialize};

use crate::app::models::CellObservation;
use crate::constants::PARSE_SUCCESS_THRESHOLD;

/// Parsing result with observations and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Successfully parsed cell observations, in input order
    pub observations: Vec<CellObservation>,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// Parsing statistics for one export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseStats {
    /// Total number of data records encountered (header row excluded)
    pub total_records: usize,

    /// Records dropped by the pre-parse radio/country filter
    pub records_filtered: usize,

    /// Number of observations successfully parsed
    pub observations_parsed: usize,

    /// Number of records skipped due to errors
    pub records_skipped: usize,

    /// Parsing errors, one entry per skipped record
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_records: 0,
            records_filtered: 0,
            observations_parsed: 0,
            records_skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Records that survived the pre-parse filter
    pub fn candidate_records(&self) -> usize {
        self.total_records.saturating_sub(self.records_filtered)
    }

    /// Success rate over filter-surviving records, as a percentage
    ///
    /// An export with no surviving candidates parses vacuously: nothing
    /// was attempted, so nothing failed.
    pub fn success_rate(&self) -> f64 {
        let candidates = self.candidate_records();
        if candidates == 0 {
            100.0
        } else {
            (self.observations_parsed as f64 / candidates as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > PARSE_SUCCESS_THRESHOLD
    }

    /// Fold statistics from a parallel parse chunk into this total
    pub fn merge(&mut self, other: &ParseStats) {
        self.total_records += other.total_records;
        self.records_filtered += other.records_filtered;
        self.observations_parsed += other.observations_parsed;
        self.records_skipped += other.records_skipped;
        self.errors.extend(other.errors.iter().cloned());
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
