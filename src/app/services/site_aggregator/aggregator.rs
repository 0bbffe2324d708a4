//! Main site aggregator implementation and grouping orchestration
//!
//! This module contains the SiteAggregator struct and coordinates the
//! grouping of observations into per-site accumulators, finalization into
//! estimates, and statistics collection.

use std::collections::HashMap;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::accumulator::SiteAccumulator;
use super::stats::{AggregationResult, AggregationStats};
use crate::app::models::{CellObservation, EstimatedSite, SiteKey};

/// Site aggregator for cell observation data
///
/// The SiteAggregator takes parsed observations (typically from the cell
/// CSV parser) and estimates one physical position per `(mcc, mnc,
/// site_id)` group using sample-weighted centroids.
///
/// # Example
///
/// ```rust
/// use mls_processor::app::services::site_aggregator::SiteAggregator;
///
/// # fn example(observations: Vec<mls_processor::CellObservation>) {
/// let aggregator = SiteAggregator::new();
/// let result = aggregator.aggregate_observations(&observations, false);
/// println!("Estimated {} sites", result.site_count());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SiteAggregator;

impl SiteAggregator {
    /// Create a new site aggregator
    pub fn new() -> Self {
        Self
    }

    /// Aggregate observations into per-site position estimates
    ///
    /// Groups observations by `(mcc, mnc, site_id)`, accumulates weighted
    /// position sums per group, then finalizes each group into an
    /// [`EstimatedSite`]. Groups are finalized in key order so statistics
    /// and logs are deterministic. An empty input yields an empty result,
    /// and a degenerate group never disturbs its neighbors.
    pub fn aggregate_observations(
        &self,
        observations: &[CellObservation],
        show_progress: bool,
    ) -> AggregationResult {
        let mut stats = AggregationStats::new();
        stats.total_observations = observations.len();

        info!(
            "Starting site aggregation for {} observations",
            observations.len()
        );

        let progress = if show_progress {
            Some(Self::create_aggregation_progress_bar(
                observations.len() as u64,
                "Site aggregation",
            ))
        } else {
            None
        };

        // Phase 1: fold every observation into its site's accumulator
        let mut groups: HashMap<SiteKey, SiteAccumulator> = HashMap::new();
        for observation in observations {
            if observation.samples == 0 {
                warn!(
                    "Zero-sample observation at {} excluded from weighting",
                    observation.site_key()
                );
            }
            groups.entry(observation.site_key()).or_default().add(observation);

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        // Phase 2: finalize groups in key order
        let mut keyed: Vec<(SiteKey, SiteAccumulator)> = groups.into_iter().collect();
        keyed.sort_by_key(|(key, _)| *key);

        let mut sites: HashMap<SiteKey, EstimatedSite> = HashMap::with_capacity(keyed.len());
        for (key, accumulator) in keyed {
            stats.zero_sample_excluded += accumulator.zero_sample_count();
            stats.observations_weighted +=
                accumulator.observation_count() - accumulator.zero_sample_count();

            if accumulator.is_degenerate() {
                stats.degenerate_sites.push(key.to_string());
                debug!(
                    "Site {} has no usable weight over {} observations, using unweighted mean",
                    key,
                    accumulator.observation_count()
                );
            }

            sites.insert(key, accumulator.estimate(&key));
        }
        stats.sites_estimated = sites.len();

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Site aggregation complete: {} sites", sites.len()));
        }

        info!(
            "Site aggregation complete: {} observations -> {} sites ({} zero-sample excluded, {} fallback groups)",
            stats.total_observations,
            stats.sites_estimated,
            stats.zero_sample_excluded,
            stats.degenerate_count()
        );

        AggregationResult::new(sites, stats)
    }

    /// Create a progress bar for aggregation operations
    fn create_aggregation_progress_bar(total: u64, operation: &str) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(operation.to_string());
        pb
    }
}
