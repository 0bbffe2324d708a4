//! CSV writers for cleaned cells and estimated sites
//!
//! This module emits the two processing outputs: a cleaned per-cell CSV
//! with the parsed observations, and a per-site CSV with the estimated
//! positions. Both writers render coordinates at a fixed decimal precision
//! and create their parent directory on demand.
//!
//! ## Architecture
//!
//! The module is organized into logical components:
//! - [`sink`] - Output trait seams for observations and estimates
//! - [`cells_writer`] - Cleaned per-cell CSV writer
//! - [`sites_writer`] - Per-site estimate CSV writer
//! - [`config`] - Writer configuration and statistics tracking
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::path::Path;
//! use mls_processor::app::services::export_writer::{
//!     CellsCsvWriter, EstimateSink, ObservationSink, SitesCsvWriter, WriterConfig,
//! };
//!
//! # fn example(
//! #     observations: Vec<mls_processor::CellObservation>,
//! #     sites: std::collections::HashMap<mls_processor::SiteKey, mls_processor::EstimatedSite>,
//! # ) -> mls_processor::Result<()> {
//! let config = WriterConfig::default();
//!
//! let mut cells = CellsCsvWriter::new(Path::new("output/cells.csv"), config.clone())?;
//! let rows = cells.write_observations(&observations)?;
//!
//! let mut estimates = SitesCsvWriter::new(Path::new("output/sites.csv"), config)?;
//! let site_rows = estimates.write_estimates(&sites)?;
//!
//! println!("Wrote {} cell rows and {} site rows", rows, site_rows);
//! # Ok(())
//! # }
//! ```

pub mod cells_writer;
pub mod config;
pub mod sink;
pub mod sites_writer;

#[cfg(test)]
pub mod tests;

// Re-export main types for convenient access
pub use cells_writer::CellsCsvWriter;
pub use config::{WriterConfig, WritingStats};
pub use sink::{EstimateSink, ObservationSink};
pub use sites_writer::SitesCsvWriter;
