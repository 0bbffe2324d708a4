//! Comprehensive tests for the site aggregator module
//!
//! This module provides unit tests for the accumulator arithmetic, the
//! grouping orchestration, and aggregation statistics.

pub mod accumulator_tests;

// Test helper functions and fixtures
use crate::app::models::{CellIdentity, CellObservation};

/// Create a test observation at a position with a given sample count
///
/// The combined cell identifier is decomposed exactly as the record parser
/// would, so sector grouping behaves as in production.
pub fn create_test_observation(
    mcc: u16,
    mnc: u16,
    cell_id: u32,
    samples: u32,
    lon: f64,
    lat: f64,
) -> CellObservation {
    let identity = CellIdentity::from_cell_id(cell_id);
    CellObservation {
        radio: "LTE".to_string(),
        mcc,
        mnc,
        tac: 500,
        pci: 0,
        lon,
        lat,
        range: 1000,
        samples,
        changeable: true,
        created: 1_000_000,
        updated: 1_000_001,
        average_signal: -90,
        site_id: identity.site_id,
        sector_id: identity.sector_id,
    }
}

/// Create a test observation on the default test network (234/1)
pub fn create_network_observation(
    cell_id: u32,
    samples: u32,
    lon: f64,
    lat: f64,
) -> CellObservation {
    create_test_observation(234, 1, cell_id, samples, lon, lat)
}

/// Assert two floats agree within aggregation tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} to be within 1e-9 of {}",
        actual,
        expected
    );
}
