//! Comprehensive tests for the export writer module
//!
//! This module provides unit tests for both CSV writers and the shared
//! configuration.

pub mod config_tests;
pub mod sites_writer_tests;

// Common test utilities used across the writer test modules
use std::collections::HashMap;

use crate::app::models::{CellIdentity, CellObservation, EstimatedSite, SiteKey};

/// Create a test observation with a given country and position
pub fn create_test_observation(mcc: u16, cell_id: u32, lon: f64, lat: f64) -> CellObservation {
    let identity = CellIdentity::from_cell_id(cell_id);
    CellObservation {
        radio: "LTE".to_string(),
        mcc,
        mnc: 1,
        tac: 500,
        pci: 3,
        lon,
        lat,
        range: 1000,
        samples: 10,
        changeable: true,
        created: 1_000_000,
        updated: 1_000_001,
        average_signal: -90,
        site_id: identity.site_id,
        sector_id: identity.sector_id,
    }
}

/// Create a site estimate mapping from (mcc, mnc, site_id, lon, lat) rows
pub fn create_test_sites(rows: &[(u16, u16, u32, f64, f64)]) -> HashMap<SiteKey, EstimatedSite> {
    let mut sites = HashMap::new();
    for &(mcc, mnc, site_id, lon, lat) in rows {
        let key = SiteKey { mcc, mnc, site_id };
        sites.insert(
            key,
            EstimatedSite {
                mcc,
                mnc,
                lon,
                lat,
                site_id,
            },
        );
    }
    sites
}

/// Read an output file back as trimmed lines
pub fn read_output_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.to_string())
        .collect()
}
