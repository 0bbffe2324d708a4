//! Data models for MLS cell export processing
//!
//! This module contains the core data structures for representing validated
//! cell-tower observations, decomposed cell identities, site grouping keys
//! and per-site location estimates, following the MLS full cell export schema.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::SECTOR_RADIX;

// =============================================================================
// Cell Identity Decomposition
// =============================================================================

/// Decomposed combined cell identifier
///
/// MLS exports carry one wide "cell" integer that packs a site identifier
/// and an intra-site sector index. For LTE the site is the eNodeB; the low
/// 8 bits enumerate its cells, the remaining high bits identify the site.
/// Both components are always derived together from that one source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIdentity {
    /// Site component: combined identifier divided by the sector radix
    pub site_id: u32,

    /// Sector component: combined identifier modulo the sector radix
    pub sector_id: u16,
}

impl CellIdentity {
    /// Decompose a combined cell identifier into site and sector components
    ///
    /// Total over all `u32` inputs; there is no failure case.
    pub fn from_cell_id(cell_id: u32) -> Self {
        Self {
            site_id: cell_id / SECTOR_RADIX,
            sector_id: (cell_id % SECTOR_RADIX) as u16,
        }
    }

    /// Recombine the components into the packed identifier form
    ///
    /// Exact inverse of [`CellIdentity::from_cell_id`] for every identity
    /// that decomposition can produce.
    pub fn combined(&self) -> u32 {
        self.site_id * SECTOR_RADIX + u32::from(self.sector_id)
    }
}

impl fmt::Display for CellIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site {} sector {}", self.site_id, self.sector_id)
    }
}

// =============================================================================
// Cell Observation Structure
// =============================================================================

/// One validated cell-tower observation from an MLS full cell export
///
/// Field names follow the export schema. Observations are created once by
/// the record parser from immutable raw input and never mutated afterward;
/// `site_id` and `sector_id` are not input columns but are derived together
/// from the combined cell identifier at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellObservation {
    /// Radio technology tag (e.g. "LTE"); passed through untouched
    pub radio: String,

    /// Mobile country code
    pub mcc: u16,

    /// Mobile network code
    pub mnc: u16,

    /// Tracking area code
    pub tac: u16,

    /// Physical cell id; 0 when the export column was empty
    pub pci: u16,

    /// Longitude in decimal degrees
    pub lon: f64,

    /// Latitude in decimal degrees
    pub lat: f64,

    /// Coverage radius estimate; units as supplied upstream, opaque here
    pub range: u32,

    /// Number of raw measurements behind this observation; drives the
    /// aggregation weight
    pub samples: u32,

    /// Whether the cell is expected to move
    pub changeable: bool,

    /// First-seen timestamp (epoch seconds)
    pub created: u32,

    /// Last-seen timestamp (epoch seconds)
    pub updated: u32,

    /// Average signal strength in dBm; 0 when the export column was empty
    pub average_signal: i16,

    /// Derived site component of the combined cell identifier
    pub site_id: u32,

    /// Derived sector component of the combined cell identifier
    pub sector_id: u16,
}

impl CellObservation {
    /// Grouping key of the physical site this observation belongs to
    pub fn site_key(&self) -> SiteKey {
        SiteKey {
            mcc: self.mcc,
            mnc: self.mnc,
            site_id: self.site_id,
        }
    }

    /// Cell identity derived at parse time
    pub fn identity(&self) -> CellIdentity {
        CellIdentity {
            site_id: self.site_id,
            sector_id: self.sector_id,
        }
    }

    /// Aggregation weight: natural logarithm of the sample count
    ///
    /// Undefined for zero samples; callers must exclude such observations
    /// before weighting.
    pub fn weight(&self) -> f64 {
        f64::from(self.samples).ln()
    }
}

// =============================================================================
// Site Grouping Key
// =============================================================================

/// Grouping key identifying one physical site
///
/// Two observations belong to the same site iff `mcc`, `mnc` and `site_id`
/// are all equal. Sectors and physical cell ids deliberately do not
/// partition: a site aggregates across all of its cells.
///
/// The derived ordering (mcc, then mnc, then site_id) is the canonical
/// sort emitters use for deterministic output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SiteKey {
    /// Mobile country code
    pub mcc: u16,

    /// Mobile network code
    pub mnc: u16,

    /// Site component of the combined cell identifier
    pub site_id: u32,
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.mcc, self.mnc, self.site_id)
    }
}

// =============================================================================
// Estimated Site Structure
// =============================================================================

/// One per-site location estimate
///
/// Produced by the site aggregator once all observations for a key are
/// known (aggregation is a batch operation); never updated incrementally.
/// `mcc`, `mnc` and `site_id` are copied from the grouping key, which every
/// constituent observation shares by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedSite {
    /// Mobile country code
    pub mcc: u16,

    /// Mobile network code
    pub mnc: u16,

    /// Estimated longitude: weighted centroid of constituent observations
    pub lon: f64,

    /// Estimated latitude: weighted centroid of constituent observations
    pub lat: f64,

    /// Site component of the combined cell identifier
    pub site_id: u32,
}

impl EstimatedSite {
    /// Grouping key this estimate was computed for
    pub fn key(&self) -> SiteKey {
        SiteKey {
            mcc: self.mcc,
            mnc: self.mnc,
            site_id: self.site_id,
        }
    }
}
