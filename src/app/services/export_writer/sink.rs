//! Output trait seams for processing results
//!
//! Downstream consumers vary (CSV files today, a database tomorrow), so the
//! pipeline hands its results to these traits rather than to concrete
//! writers. Implementations own all serialization concerns, including any
//! additional business filtering and surrogate row identifiers.

use std::collections::HashMap;

use crate::Result;
use crate::app::models::{CellObservation, EstimatedSite, SiteKey};

/// Sink for the cleaned per-cell observation sequence
pub trait ObservationSink {
    /// Write the full observation sequence, returning rows written
    fn write_observations(&mut self, observations: &[CellObservation]) -> Result<usize>;
}

/// Sink for the per-site position estimates
///
/// The mapping's iteration order is unspecified; implementations that need
/// determinism must sort by [`SiteKey`] themselves.
pub trait EstimateSink {
    /// Write every site estimate, returning rows written
    fn write_estimates(&mut self, sites: &HashMap<SiteKey, EstimatedSite>) -> Result<usize>;
}
