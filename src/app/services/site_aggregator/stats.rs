//! Aggregation statistics and result structures
//!
//! This module provides types for tracking aggregation outcomes and
//! organizing estimated sites for downstream writing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::app::models::{EstimatedSite, SiteKey};

/// Statistics for one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Total number of input observations
    pub total_observations: usize,
    /// Observations that entered the weighted sums
    pub observations_weighted: usize,
    /// Observations excluded from weighting for having zero samples
    pub zero_sample_excluded: usize,
    /// Number of sites estimated
    pub sites_estimated: usize,
    /// Keys of groups that fell back to the unweighted mean, in key order
    pub degenerate_sites: Vec<String>,
}

impl AggregationStats {
    /// Create new empty aggregation statistics
    pub fn new() -> Self {
        Self {
            total_observations: 0,
            observations_weighted: 0,
            zero_sample_excluded: 0,
            sites_estimated: 0,
            degenerate_sites: Vec::new(),
        }
    }

    /// Number of groups that used the fallback mean
    pub fn degenerate_count(&self) -> usize {
        self.degenerate_sites.len()
    }

    /// Mean number of observations per estimated site
    pub fn observations_per_site(&self) -> f64 {
        if self.sites_estimated == 0 {
            0.0
        } else {
            self.total_observations as f64 / self.sites_estimated as f64
        }
    }

    /// Get summary of aggregation statistics
    pub fn summary(&self) -> String {
        format!(
            "Aggregation Summary: {} observations -> {} sites \
             ({:.1} observations/site) | Zero-sample excluded: {} | \
             Fallback groups: {}",
            self.total_observations,
            self.sites_estimated,
            self.observations_per_site(),
            self.zero_sample_excluded,
            self.degenerate_count()
        )
    }
}

impl Default for AggregationStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of site aggregation
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Estimated site positions keyed by site
    pub sites: HashMap<SiteKey, EstimatedSite>,
    /// Aggregation statistics
    pub stats: AggregationStats,
}

impl AggregationResult {
    /// Create a new aggregation result
    pub fn new(sites: HashMap<SiteKey, EstimatedSite>, stats: AggregationStats) -> Self {
        Self { sites, stats }
    }

    /// Get the number of estimated sites
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Estimated sites in key order, for deterministic output
    pub fn sorted_sites(&self) -> Vec<&EstimatedSite> {
        let mut keyed: Vec<(&SiteKey, &EstimatedSite)> = self.sites.iter().collect();
        keyed.sort_by_key(|(key, _)| **key);
        keyed.into_iter().map(|(_, site)| site).collect()
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
