//! MLS full cell export parser
//!
//! This module provides a parser for the MLS/OpenCellID "full cell export"
//! CSV format: one positional 14-column record per observed radio cell.
//! Records are validated strictly, with one documented exception for the
//! combined cell identifier, and bad records are skipped without aborting
//! the batch.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`parser`] - File-level orchestration, pre-parse filtering, parallel path
//! - [`record_parser`] - Individual export record processing
//! - [`field_parsers`] - Utility functions for strict field decoding
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use mls_processor::app::services::cell_csv_parser::{CellCsvParser, RecordFilter};
//!
//! # async fn example() -> mls_processor::Result<()> {
//! let filter = RecordFilter::new(Some("LTE".to_string()), Some(234));
//! let parser = CellCsvParser::new(filter);
//! let result = parser.parse_file(std::path::Path::new("export.csv")).await?;
//!
//! println!("Parsed {} observations from {} records",
//!          result.stats.observations_parsed,
//!          result.stats.total_records);
//! # Ok(())
//! # }
//! ```

pub mod field_parsers;
pub mod parser;
pub mod record_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use parser::{CellCsvParser, RecordFilter};
pub use stats::{ParseResult, ParseStats};
