//! Test utilities and fixtures for MLS export parser testing
//!
//! This module provides common record builders and export file fixtures
//! used across the parser test modules.

use std::io::Write;

use csv::StringRecord;
use tempfile::NamedTempFile;

mod record_parser_tests;

/// Build a StringRecord from field literals
pub fn make_record(fields: &[&str]) -> StringRecord {
    StringRecord::from(fields.to_vec())
}

/// A fully valid LTE export record
///
/// Combined cell identifier 25601 decomposes to site 100, sector 1.
pub fn valid_record_fields() -> Vec<&'static str> {
    vec![
        "LTE",      // radio
        "234",      // mcc
        "1",        // mnc
        "500",      // tac
        "25601",    // cell
        "3",        // pci
        "10.0",     // lon
        "50.0",     // lat
        "1000",     // range
        "10",       // samples
        "true",     // changeable
        "1000000",  // created
        "1000001",  // updated
        "-90",      // average_signal
    ]
}

/// A small export file with the real header row and mixed content:
/// three valid LTE/234 records across two sites, one GSM record, one
/// record from another country, and one LTE/234 record with a bad area
/// width (70000 does not fit u16)
pub fn create_test_export_csv() -> String {
    r#"radio,mcc,net,area,cell,unit,lon,lat,range,samples,changeable,created,updated,averageSignal
LTE,234,1,500,25601,3,10.0,50.0,1000,10,1,1000000,1000001,-90
LTE,234,1,500,25602,4,10.2,50.2,1000,20,1,1000000,1000001,-88
GSM,234,1,500,25603,,10.4,50.4,1000,30,1,1000000,1000001,
LTE,310,260,700,51201,7,-73.9,40.7,1500,12,1,1000000,1000001,-95
LTE,234,1,500,51457,2,11.0,51.0,800,40,1,1000000,1000001,
LTE,234,1,70000,25604,5,10.6,50.6,1000,15,1,1000000,1000001,-92"#
        .to_string()
}

/// Helper to create a temporary export file with given content
pub fn create_temp_export(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
