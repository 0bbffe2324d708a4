//! Unit tests for per-site accumulation arithmetic

use super::{assert_close, create_network_observation};
use crate::app::models::SiteKey;
use crate::app::services::site_aggregator::SiteAccumulator;

fn test_key() -> SiteKey {
    SiteKey {
        mcc: 234,
        mnc: 1,
        site_id: 100,
    }
}

#[test]
fn test_empty_accumulator_is_degenerate() {
    let accumulator = SiteAccumulator::new();
    assert!(accumulator.is_degenerate());
    assert_eq!(accumulator.observation_count(), 0);
    assert_eq!(accumulator.total_weight(), 0.0);
}

#[test]
fn test_single_member_estimate_is_its_own_position() {
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 10, 10.5, 50.5));

    assert!(!accumulator.is_degenerate());
    let estimate = accumulator.estimate(&test_key());
    assert_close(estimate.lat, 50.5);
    assert_close(estimate.lon, 10.5);
    assert_eq!(estimate.mcc, 234);
    assert_eq!(estimate.mnc, 1);
    assert_eq!(estimate.site_id, 100);
}

#[test]
fn test_centroid_pulls_toward_heavier_member() {
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 10, 10.0, 50.0));
    accumulator.add(&create_network_observation(25602, 10_000, 11.0, 51.0));

    let estimate = accumulator.estimate(&test_key());

    let light = f64::from(10u32).ln();
    let heavy = f64::from(10_000u32).ln();
    let expected_lat = (light * 50.0 + heavy * 51.0) / (light + heavy);
    let expected_lon = (light * 10.0 + heavy * 11.0) / (light + heavy);
    assert_close(estimate.lat, expected_lat);
    assert_close(estimate.lon, expected_lon);

    // ln(10000) = 4 ln(10), so the heavy member carries 4/5 of the pull
    assert!(estimate.lat > 50.75 && estimate.lat < 50.85);
}

#[test]
fn test_lone_single_sample_member_falls_back_to_mean() {
    // ln(1) = 0: the group has no usable weight
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 1, 10.0, 50.0));

    assert!(accumulator.is_degenerate());
    assert_eq!(accumulator.total_weight(), 0.0);

    let estimate = accumulator.estimate(&test_key());
    assert_close(estimate.lat, 50.0);
    assert_close(estimate.lon, 10.0);
}

#[test]
fn test_weightless_member_does_not_move_a_weighted_group() {
    // samples = 1 carries weight ln(1) = 0, so the estimate sits exactly
    // on the other member
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 1, 170.0, 85.0));
    accumulator.add(&create_network_observation(25602, 3, 10.0, 50.0));

    assert!(!accumulator.is_degenerate());
    let estimate = accumulator.estimate(&test_key());
    assert_close(estimate.lat, 50.0);
    assert_close(estimate.lon, 10.0);
}

#[test]
fn test_zero_sample_member_enters_only_the_fallback_sums() {
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 0, 170.0, 85.0));
    accumulator.add(&create_network_observation(25602, 100, 10.0, 50.0));

    assert_eq!(accumulator.observation_count(), 2);
    assert_eq!(accumulator.zero_sample_count(), 1);

    // The group has real weight, so the far-off zero-sample position
    // must not move the estimate at all
    assert!(!accumulator.is_degenerate());
    let estimate = accumulator.estimate(&test_key());
    assert_close(estimate.lat, 50.0);
    assert_close(estimate.lon, 10.0);
}

#[test]
fn test_fallback_mean_covers_every_member() {
    // One zero-sample and one single-sample member: no weight anywhere,
    // so the mean spans both positions
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 0, 10.0, 10.0));
    accumulator.add(&create_network_observation(25602, 1, 20.0, 30.0));

    assert!(accumulator.is_degenerate());
    let estimate = accumulator.estimate(&test_key());
    assert_close(estimate.lat, 20.0);
    assert_close(estimate.lon, 15.0);
}

#[test]
fn test_merge_matches_single_pass_accumulation() {
    let observations = vec![
        create_network_observation(25601, 10, 10.0, 50.0),
        create_network_observation(25602, 500, 10.2, 50.2),
        create_network_observation(25603, 0, 10.4, 50.4),
        create_network_observation(25604, 7_000, 10.6, 50.6),
        create_network_observation(25605, 1, 10.8, 50.8),
    ];

    let mut single_pass = SiteAccumulator::new();
    for observation in &observations {
        single_pass.add(observation);
    }

    let mut left = SiteAccumulator::new();
    for observation in &observations[..2] {
        left.add(observation);
    }
    let mut right = SiteAccumulator::new();
    for observation in &observations[2..] {
        right.add(observation);
    }
    left.merge(&right);

    assert_eq!(left.observation_count(), single_pass.observation_count());
    assert_eq!(left.zero_sample_count(), single_pass.zero_sample_count());
    assert_close(left.total_weight(), single_pass.total_weight());

    let merged_estimate = left.estimate(&test_key());
    let single_estimate = single_pass.estimate(&test_key());
    assert_close(merged_estimate.lat, single_estimate.lat);
    assert_close(merged_estimate.lon, single_estimate.lon);
}

#[test]
fn test_negative_coordinates_pass_through() {
    let mut accumulator = SiteAccumulator::new();
    accumulator.add(&create_network_observation(25601, 10, -73.9, -40.7));
    accumulator.add(&create_network_observation(25602, 10, -74.1, -40.9));

    let estimate = accumulator.estimate(&test_key());
    assert_close(estimate.lon, -74.0);
    assert_close(estimate.lat, -40.8);
}
