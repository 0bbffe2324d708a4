//! Unit tests for whole-record parsing

use super::{make_record, valid_record_fields};
use crate::Error;
use crate::app::services::cell_csv_parser::record_parser::parse_cell_record;
use crate::constants::fields;

#[test]
fn test_parses_fully_populated_record() {
    let record = make_record(&valid_record_fields());
    let obs = parse_cell_record(&record).unwrap();

    assert_eq!(obs.radio, "LTE");
    assert_eq!(obs.mcc, 234);
    assert_eq!(obs.mnc, 1);
    assert_eq!(obs.tac, 500);
    assert_eq!(obs.pci, 3);
    assert_eq!(obs.lon, 10.0);
    assert_eq!(obs.lat, 50.0);
    assert_eq!(obs.range, 1000);
    assert_eq!(obs.samples, 10);
    assert!(obs.changeable);
    assert_eq!(obs.created, 1_000_000);
    assert_eq!(obs.updated, 1_000_001);
    assert_eq!(obs.average_signal, -90);

    // 25601 = 100 * 256 + 1
    assert_eq!(obs.site_id, 100);
    assert_eq!(obs.sector_id, 1);
}

#[test]
fn test_short_record_is_rejected_as_a_whole() {
    let record = make_record(&["LTE", "234", "1"]);
    match parse_cell_record(&record) {
        Err(Error::InvalidField { field, message }) => {
            assert_eq!(field, "record");
            assert!(message.contains("found 3"), "message was: {}", message);
        }
        other => panic!("expected InvalidField, got {:?}", other),
    }
}

#[test]
fn test_bad_required_field_names_the_column() {
    let mut fields_vec = valid_record_fields();
    fields_vec[fields::MCC] = "not-a-number";
    match parse_cell_record(&make_record(&fields_vec)) {
        Err(Error::InvalidField { field, .. }) => assert_eq!(field, "mcc"),
        other => panic!("expected InvalidField, got {:?}", other),
    }
}

#[test]
fn test_tac_overflow_rejects_the_record() {
    let mut fields_vec = valid_record_fields();
    fields_vec[fields::TAC] = "70000";
    assert!(parse_cell_record(&make_record(&fields_vec)).is_err());
}

#[test]
fn test_optional_fields_default_to_zero_when_empty() {
    let mut fields_vec = valid_record_fields();
    fields_vec[fields::PCI] = "";
    fields_vec[fields::AVERAGE_SIGNAL] = "";
    let obs = parse_cell_record(&make_record(&fields_vec)).unwrap();
    assert_eq!(obs.pci, 0);
    assert_eq!(obs.average_signal, 0);
}

#[test]
fn test_unusable_cell_identifier_keeps_the_record() {
    let mut fields_vec = valid_record_fields();
    fields_vec[fields::CELL_ID] = "garbled";
    let obs = parse_cell_record(&make_record(&fields_vec)).unwrap();

    // Identity degrades to zero; everything else survives untouched
    assert_eq!(obs.site_id, 0);
    assert_eq!(obs.sector_id, 0);
    assert_eq!(obs.mcc, 234);
    assert_eq!(obs.samples, 10);
}

#[test]
fn test_sector_boundary_decomposition() {
    // 25856 = 101 * 256 exactly, so sector 0 of the next site over
    let mut fields_vec = valid_record_fields();
    fields_vec[fields::CELL_ID] = "25856";
    let obs = parse_cell_record(&make_record(&fields_vec)).unwrap();
    assert_eq!(obs.site_id, 101);
    assert_eq!(obs.sector_id, 0);
}

#[test]
fn test_parsing_is_deterministic() {
    let record = make_record(&valid_record_fields());
    let first = parse_cell_record(&record).unwrap();
    let second = parse_cell_record(&record).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_surplus_fields_are_tolerated() {
    let mut fields_vec = valid_record_fields();
    fields_vec.push("extra");
    fields_vec.push("columns");
    let obs = parse_cell_record(&make_record(&fields_vec)).unwrap();
    assert_eq!(obs.site_id, 100);
}
