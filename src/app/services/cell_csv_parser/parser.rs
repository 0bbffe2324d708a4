//! Core MLS export parser implementation
//!
//! This module provides the file-level orchestration: CSV reading, header
//! handling, pre-parse filtering, per-record error recovery, and the
//! chunked parallel parse path for large exports.

use std::path::Path;

use csv::StringRecord;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::{debug, info, trace};

use super::record_parser::parse_cell_record;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::CellObservation;
use crate::constants::{DEFAULT_PARSE_CHUNK_SIZE, fields};
use crate::{Error, Result};

/// Pre-parse record filter
///
/// Rows whose radio tag or raw mcc text differ from the configured values
/// never reach the record parser. The mcc comparison is raw text on
/// purpose: a record carrying "0234" is a different raw value and does not
/// match a filter of 234.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    radio: Option<String>,
    mcc_text: Option<String>,
}

impl RecordFilter {
    /// Create a filter; `None` disables that dimension
    pub fn new(radio: Option<String>, mcc: Option<u16>) -> Self {
        Self {
            radio,
            mcc_text: mcc.map(|code| code.to_string()),
        }
    }

    /// Filter that keeps every record
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Check whether a raw record passes the filter
    pub fn matches(&self, record: &StringRecord) -> bool {
        if let Some(radio) = &self.radio {
            if record.get(fields::RADIO) != Some(radio.as_str()) {
                return false;
            }
        }
        if let Some(mcc_text) = &self.mcc_text {
            if record.get(fields::MCC) != Some(mcc_text.as_str()) {
                return false;
            }
        }
        true
    }

    /// True when no dimension is configured
    pub fn is_passthrough(&self) -> bool {
        self.radio.is_none() && self.mcc_text.is_none()
    }
}

/// MLS full cell export parser
///
/// This parser focuses on essential functionality:
/// - Strict per-field validation with per-record error recovery
/// - Pre-parse radio technology / country code filtering
/// - Optional chunked parallel parsing across blocking workers
#[derive(Debug)]
pub struct CellCsvParser {
    filter: RecordFilter,
    workers: usize,
    chunk_size: usize,
}

impl CellCsvParser {
    /// Create a new parser with the given pre-parse filter
    pub fn new(filter: RecordFilter) -> Self {
        Self {
            filter,
            workers: 1,
            chunk_size: DEFAULT_PARSE_CHUNK_SIZE,
        }
    }

    /// Set the number of blocking parse workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the number of records handed to one parse worker at a time
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Parse an export file and return observations with statistics
    pub async fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        self.parse_file_with_progress(file_path, None).await
    }

    /// Parse an export file, ticking a progress bar per data record
    pub async fn parse_file_with_progress(
        &self,
        file_path: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<ParseResult> {
        info!("Parsing MLS cell export: {}", file_path.display());

        if !file_path.exists() {
            return Err(Error::file_not_found(file_path.display().to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(file_path)
            .map_err(|e| {
                Error::csv_parsing(
                    file_path.display().to_string(),
                    "Failed to open export".to_string(),
                    Some(e),
                )
            })?;

        let mut stats = ParseStats::new();
        let mut surviving: Vec<(usize, StringRecord)> = Vec::new();

        for result in reader.records() {
            stats.total_records += 1;
            if let Some(bar) = progress {
                bar.inc(1);
            }

            match result {
                Ok(record) => {
                    if !self.filter.matches(&record) {
                        stats.records_filtered += 1;
                        trace!("Filtered record {}", stats.total_records);
                        continue;
                    }
                    surviving.push((stats.total_records, record));
                }
                Err(e) => {
                    stats.records_skipped += 1;
                    stats.errors.push(format!(
                        "CSV framing error at record {}: {}",
                        stats.total_records, e
                    ));
                }
            }
        }

        let observations = if self.workers > 1 && surviving.len() > self.chunk_size {
            self.parse_records_parallel(surviving, &mut stats).await?
        } else {
            parse_records(surviving, &mut stats)
        };

        info!(
            "Parsed {} observations from {} records ({} filtered, {} skipped)",
            stats.observations_parsed,
            stats.total_records,
            stats.records_filtered,
            stats.records_skipped
        );

        Ok(ParseResult {
            observations,
            stats,
        })
    }

    /// Fan surviving records out across blocking parse workers
    ///
    /// Record parsing is pure, so workers share nothing; chunks are
    /// reassembled in order and the observation sequence is identical to
    /// the sequential path.
    async fn parse_records_parallel(
        &self,
        records: Vec<(usize, StringRecord)>,
        stats: &mut ParseStats,
    ) -> Result<Vec<CellObservation>> {
        let chunks: Vec<Vec<(usize, StringRecord)>> = records
            .chunks(self.chunk_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        debug!(
            "Parsing {} chunks of up to {} records on {} workers",
            chunks.len(),
            self.chunk_size,
            self.workers
        );

        let mut results: Vec<(usize, Vec<CellObservation>, ParseStats)> =
            stream::iter(chunks.into_iter().enumerate().map(|(index, chunk)| {
                tokio::task::spawn_blocking(move || {
                    let mut chunk_stats = ParseStats::new();
                    let observations = parse_records(chunk, &mut chunk_stats);
                    (index, observations, chunk_stats)
                })
            }))
            .buffer_unordered(self.workers)
            .map(|joined| {
                joined.map_err(|e| {
                    Error::processing_interrupted(format!("parse worker failed: {}", e))
                })
            })
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        results.sort_by_key(|(index, _, _)| *index);

        let mut observations = Vec::with_capacity(records_capacity(&results));
        for (_, chunk_observations, chunk_stats) in results {
            observations.extend(chunk_observations);
            stats.merge(&chunk_stats);
        }
        Ok(observations)
    }
}

fn records_capacity(results: &[(usize, Vec<CellObservation>, ParseStats)]) -> usize {
    results.iter().map(|(_, observations, _)| observations.len()).sum()
}

/// Parse a batch of surviving records, recovering per record
fn parse_records(
    records: Vec<(usize, StringRecord)>,
    stats: &mut ParseStats,
) -> Vec<CellObservation> {
    let mut observations = Vec::with_capacity(records.len());
    for (record_number, record) in records {
        match parse_cell_record(&record) {
            Ok(observation) => {
                observations.push(observation);
                stats.observations_parsed += 1;
            }
            Err(e) => {
                stats.records_skipped += 1;
                stats.errors.push(format!("Record {}: {}", record_number, e));
                debug!("Skipped record {}: {}", record_number, e);
            }
        }
    }
    observations
}
