//! Unit tests for the site estimate writer

use tempfile::TempDir;

use super::{create_test_sites, read_output_lines};
use crate::app::services::export_writer::{EstimateSink, SitesCsvWriter, WriterConfig};

#[test]
fn test_writes_header_and_site_rows() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("sites.csv");
    let sites = create_test_sites(&[(234, 1, 100, 10.0, 50.0)]);

    let mut writer = SitesCsvWriter::new(&output_path, WriterConfig::default()).unwrap();
    let rows = writer.write_estimates(&sites).unwrap();

    assert_eq!(rows, 1);
    let lines = read_output_lines(&output_path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "MCC,MNC,Lon,Lat,SiteID");
    assert_eq!(lines[1], "234,1,10.000000,50.000000,100");
}

#[test]
fn test_rows_come_out_in_key_order() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("sites.csv");
    // Insertion order deliberately scrambled; the map iterates arbitrarily
    let sites = create_test_sites(&[
        (310, 1, 100, -73.9, 40.7),
        (234, 2, 100, 20.0, 52.0),
        (234, 1, 300, 12.0, 53.0),
        (234, 1, 100, 10.0, 50.0),
    ]);

    let mut writer = SitesCsvWriter::new(&output_path, WriterConfig::default()).unwrap();
    writer.write_estimates(&sites).unwrap();

    let lines = read_output_lines(&output_path);
    let keys: Vec<&str> = lines[1..]
        .iter()
        .map(|line| line.rsplit(',').next().unwrap())
        .collect();
    assert_eq!(keys, vec!["100", "300", "100", "100"]);
    assert!(lines[1].starts_with("234,1,"));
    assert!(lines[2].starts_with("234,1,"));
    assert!(lines[3].starts_with("234,2,"));
    assert!(lines[4].starts_with("310,1,"));
}

#[test]
fn test_repeat_runs_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let sites = create_test_sites(&[
        (234, 1, 100, 10.0, 50.0),
        (234, 1, 200, 10.5, 50.5),
        (310, 1, 100, -73.9, 40.7),
    ]);

    let first_path = temp_dir.path().join("first.csv");
    let mut first = SitesCsvWriter::new(&first_path, WriterConfig::default()).unwrap();
    first.write_estimates(&sites).unwrap();

    let second_path = temp_dir.path().join("second.csv");
    let mut second = SitesCsvWriter::new(&second_path, WriterConfig::default()).unwrap();
    second.write_estimates(&sites).unwrap();

    assert_eq!(
        std::fs::read(&first_path).unwrap(),
        std::fs::read(&second_path).unwrap()
    );
}

#[test]
fn test_empty_mapping_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("sites.csv");

    let mut writer = SitesCsvWriter::new(&output_path, WriterConfig::default()).unwrap();
    let rows = writer.write_estimates(&create_test_sites(&[])).unwrap();

    assert_eq!(rows, 0);
    let lines = read_output_lines(&output_path);
    assert_eq!(lines.len(), 1);
    assert_eq!(writer.stats().rows_written, 0);
}

#[test]
fn test_precision_applies_to_estimates() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("sites.csv");
    let sites = create_test_sites(&[(234, 1, 100, 10.123456789, 50.987654321)]);

    let config = WriterConfig::default().with_coordinate_precision(3);
    let mut writer = SitesCsvWriter::new(&output_path, config).unwrap();
    writer.write_estimates(&sites).unwrap();

    let lines = read_output_lines(&output_path);
    assert_eq!(lines[1], "234,1,10.123,50.988,100");
}
