//! Application constants for MLS processor
//!
//! This module contains the export record layout, identifier decomposition
//! constants, and filter/output defaults used throughout the application.

// =============================================================================
// Export Record Layout
// =============================================================================

/// Column positions in an MLS full cell export record
///
/// The export is positional: the header row names the columns
/// (radio,mcc,net,area,cell,unit,lon,lat,range,samples,changeable,
/// created,updated,averageSignal) but parsing is by index.
pub mod fields {
    /// Radio technology tag (pass-through string)
    pub const RADIO: usize = 0;

    /// Mobile country code
    pub const MCC: usize = 1;

    /// Mobile network code (column "net")
    pub const MNC: usize = 2;

    /// Tracking area code (column "area")
    pub const TAC: usize = 3;

    /// Combined cell identifier (column "cell")
    pub const CELL_ID: usize = 4;

    /// Physical cell id (column "unit"), optional
    pub const PCI: usize = 5;

    /// Longitude in decimal degrees
    pub const LON: usize = 6;

    /// Latitude in decimal degrees
    pub const LAT: usize = 7;

    /// Coverage radius estimate
    pub const RANGE: usize = 8;

    /// Observation sample count
    pub const SAMPLES: usize = 9;

    /// Changeable flag (boolean literal)
    pub const CHANGEABLE: usize = 10;

    /// Creation timestamp (epoch seconds)
    pub const CREATED: usize = 11;

    /// Last update timestamp (epoch seconds)
    pub const UPDATED: usize = 12;

    /// Average signal strength, optional
    pub const AVERAGE_SIGNAL: usize = 13;

    /// Minimum number of fields a data record must carry
    pub const MIN_FIELDS: usize = 14;
}

/// Radio technology tags that appear in MLS exports
pub const KNOWN_RADIO_TYPES: &[&str] = &["GSM", "UMTS", "LTE", "CDMA", "NR"];

// =============================================================================
// Cell Identifier Decomposition
// =============================================================================

/// Radix of the combined cell identifier split
///
/// The low 8 bits of the combined identifier enumerate sectors within a
/// site (an LTE eNodeB hosts at most 256 cells); the remaining high-order
/// bits identify the site itself.
pub const SECTOR_RADIX: u32 = 256;

// =============================================================================
// Filter Defaults
// =============================================================================

/// Default radio technology filter applied before parsing
pub const DEFAULT_RADIO_FILTER: &str = "LTE";

/// Default mobile country code filter (234 = United Kingdom)
pub const DEFAULT_MCC_FILTER: u16 = 234;

// =============================================================================
// Export File Discovery
// =============================================================================

/// Filename glob matched when scanning a directory for exports
pub const EXPORT_FILE_PATTERN: &str = "MLS-full-cell-export-*.csv";

/// Regex capturing the vintage stamp embedded in an export filename,
/// e.g. "MLS-full-cell-export-2023-08-16T000000.csv"
pub const EXPORT_VINTAGE_REGEX: &str = r"(\d{4}-\d{2}-\d{2})T(\d{6})";

/// Format of a vintage stamp once the date and time captures are joined
pub const EXPORT_VINTAGE_FORMAT: &str = "%Y-%m-%d %H%M%S";

// =============================================================================
// Output Defaults
// =============================================================================

/// Cleaned per-cell output filename
pub const CELLS_OUTPUT_FILENAME: &str = "cells.csv";

/// Per-site estimate output filename
pub const SITES_OUTPUT_FILENAME: &str = "sites.csv";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Decimal places written for coordinates in both output files
pub const DEFAULT_COORDINATE_PRECISION: usize = 6;

/// Upper bound on coordinate decimal places
pub const MAX_COORDINATE_PRECISION: usize = 10;

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Fallback worker count when system detection is unavailable
pub const DEFAULT_PARALLEL_WORKERS: usize = 8;

/// Upper bound on configurable parse workers
pub const MAX_PARALLEL_WORKERS: usize = 64;

/// Records handed to one blocking parse worker at a time
pub const DEFAULT_PARSE_CHUNK_SIZE: usize = 50_000;

/// Parse success-rate threshold (percent) below which a batch is flagged
pub const PARSE_SUCCESS_THRESHOLD: f64 = 90.0;

// =============================================================================
// Helper Functions
// =============================================================================

/// Field name for a record position, used in diagnostics
pub fn field_name(position: usize) -> &'static str {
    match position {
        fields::RADIO => "radio",
        fields::MCC => "mcc",
        fields::MNC => "mnc",
        fields::TAC => "tac",
        fields::CELL_ID => "cell",
        fields::PCI => "pci",
        fields::LON => "lon",
        fields::LAT => "lat",
        fields::RANGE => "range",
        fields::SAMPLES => "samples",
        fields::CHANGEABLE => "changeable",
        fields::CREATED => "created",
        fields::UPDATED => "updated",
        fields::AVERAGE_SIGNAL => "average_signal",
        _ => "unknown",
    }
}

/// Check whether a radio tag is one of the technologies MLS exports carry
pub fn is_known_radio_type(radio: &str) -> bool {
    KNOWN_RADIO_TYPES.contains(&radio)
}
