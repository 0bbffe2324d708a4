//! Site position aggregation for cell observations
//!
//! This module estimates physical site positions from parsed cell
//! observations. Observations are grouped by `(mcc, mnc, site_id)` so that
//! every sector and cell of one site contributes to a single estimate, and
//! each group's position is the sample-weighted centroid of its members.
//!
//! ## Architecture
//!
//! The module is organized into logical components:
//! - [`aggregator`] - Main SiteAggregator struct and grouping orchestration
//! - [`accumulator`] - Per-site weighted sum accumulation and the fallback mean
//! - [`stats`] - Aggregation statistics and result structures
//!
//! ## Weighting
//!
//! Each observation carries `ln(samples)` weight: a cell seen ten thousand
//! times anchors the estimate, a cell seen twice barely nudges it. Two edge
//! cases are handled without poisoning the arithmetic:
//!
//! - Zero-sample observations have no defined weight; they are excluded
//!   from the weighted sums and reported in the statistics.
//! - A group whose total weight is zero (a lone single-sample cell) falls
//!   back to the plain arithmetic mean of its members' positions.
//!
//! ## Usage
//!
//! ```rust
//! use mls_processor::app::services::site_aggregator::SiteAggregator;
//!
//! # fn example(observations: Vec<mls_processor::CellObservation>) {
//! let aggregator = SiteAggregator::new();
//! let result = aggregator.aggregate_observations(&observations, false);
//!
//! println!("Estimated {} sites: {}", result.site_count(), result.summary());
//! # }
//! ```

pub mod accumulator;
pub mod aggregator;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use accumulator::SiteAccumulator;
pub use aggregator::SiteAggregator;
pub use stats::{AggregationResult, AggregationStats};
