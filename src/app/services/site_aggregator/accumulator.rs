//! Per-site accumulation of weighted position sums
//!
//! This module contains the numeric core of site estimation: a running
//! accumulator per site that folds in observations one at a time and can be
//! merged with accumulators built independently over other partitions of
//! the same input.

use crate::app::models::{CellObservation, EstimatedSite, SiteKey};

/// Running position sums for one site
///
/// The accumulator keeps both the sample-weighted sums and the plain
/// position sums: the weighted sums produce the estimate, the plain sums
/// back the arithmetic-mean fallback when a group carries no usable weight.
/// Zero-sample observations enter only the plain sums.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SiteAccumulator {
    total_weight: f64,
    weighted_lat_sum: f64,
    weighted_lon_sum: f64,
    lat_sum: f64,
    lon_sum: f64,
    observation_count: usize,
    zero_sample_count: usize,
}

impl SiteAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running sums
    ///
    /// An observation with zero samples has no defined weight (`ln(0)`)
    /// and is excluded from the weighted sums; it still participates in
    /// the fallback mean.
    pub fn add(&mut self, observation: &CellObservation) {
        self.observation_count += 1;
        self.lat_sum += observation.lat;
        self.lon_sum += observation.lon;

        if observation.samples == 0 {
            self.zero_sample_count += 1;
            return;
        }

        let weight = observation.weight();
        self.total_weight += weight;
        self.weighted_lat_sum += weight * observation.lat;
        self.weighted_lon_sum += weight * observation.lon;
    }

    /// Combine another accumulator for the same site into this one
    ///
    /// Field-wise addition: the weighted-centroid formula is associative,
    /// so merging partial accumulators matches the single-pass result up
    /// to floating-point rounding.
    pub fn merge(&mut self, other: &SiteAccumulator) {
        self.total_weight += other.total_weight;
        self.weighted_lat_sum += other.weighted_lat_sum;
        self.weighted_lon_sum += other.weighted_lon_sum;
        self.lat_sum += other.lat_sum;
        self.lon_sum += other.lon_sum;
        self.observation_count += other.observation_count;
        self.zero_sample_count += other.zero_sample_count;
    }

    /// Number of observations folded in, zero-sample members included
    pub fn observation_count(&self) -> usize {
        self.observation_count
    }

    /// Number of members excluded from weighting for having zero samples
    pub fn zero_sample_count(&self) -> usize {
        self.zero_sample_count
    }

    /// Sum of member weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// True when the accumulated weight cannot produce a weighted centroid
    ///
    /// Covers the lone single-sample cell (`ln(1) = 0`) and any group whose
    /// every member was excluded for zero samples.
    pub fn is_degenerate(&self) -> bool {
        !(self.total_weight.is_finite() && self.total_weight > 0.0)
    }

    /// Produce the position estimate for this site
    ///
    /// Degenerate groups use the arithmetic mean of all member positions
    /// instead of the weighted centroid. At least one observation must have
    /// been added.
    pub fn estimate(&self, key: &SiteKey) -> EstimatedSite {
        let (lat, lon) = if self.is_degenerate() {
            let count = self.observation_count as f64;
            (self.lat_sum / count, self.lon_sum / count)
        } else {
            (
                self.weighted_lat_sum / self.total_weight,
                self.weighted_lon_sum / self.total_weight,
            )
        };

        EstimatedSite {
            mcc: key.mcc,
            mnc: key.mnc,
            lon,
            lat,
            site_id: key.site_id,
        }
    }
}
