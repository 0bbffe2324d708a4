//! Unit tests for writer configuration and statistics

use crate::app::services::export_writer::{WriterConfig, WritingStats};
use crate::constants::DEFAULT_COORDINATE_PRECISION;

#[test]
fn test_default_config() {
    let config = WriterConfig::default();
    assert_eq!(config.coordinate_precision, DEFAULT_COORDINATE_PRECISION);
    assert!(config.mcc_filter.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_builder() {
    let config = WriterConfig::new()
        .with_coordinate_precision(4)
        .with_mcc_filter(Some(234));

    assert_eq!(config.coordinate_precision, 4);
    assert_eq!(config.mcc_filter, Some(234));
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_rejects_excess_precision() {
    let config = WriterConfig::new().with_coordinate_precision(11);
    assert!(config.validate().is_err());

    let boundary = WriterConfig::new().with_coordinate_precision(10);
    assert!(boundary.validate().is_ok());
}

#[test]
fn test_config_validation_rejects_bad_mcc() {
    assert!(WriterConfig::new().with_mcc_filter(Some(0)).validate().is_err());
    assert!(
        WriterConfig::new()
            .with_mcc_filter(Some(1000))
            .validate()
            .is_err()
    );
    assert!(
        WriterConfig::new()
            .with_mcc_filter(Some(999))
            .validate()
            .is_ok()
    );
}

#[test]
fn test_stats_rates() {
    let stats = WritingStats {
        rows_written: 75,
        rows_filtered: 25,
        bytes_written: 4096,
    };
    assert_eq!(stats.rows_seen(), 100);
    assert_eq!(stats.filter_rate(), 25.0);

    let empty = WritingStats::new();
    assert_eq!(empty.filter_rate(), 0.0);
}

#[test]
fn test_format_bytes() {
    assert_eq!(WritingStats::format_bytes(0), "0 B");
    assert_eq!(WritingStats::format_bytes(512), "512 B");
    assert_eq!(WritingStats::format_bytes(1024), "1.00 KB");
    assert_eq!(WritingStats::format_bytes(1536), "1.50 KB");
    assert_eq!(WritingStats::format_bytes(1024 * 1024), "1.00 MB");
}

#[test]
fn test_stats_summary() {
    let stats = WritingStats {
        rows_written: 100,
        rows_filtered: 10,
        bytes_written: 2048,
    };
    let summary = stats.summary();
    assert!(summary.contains("rows: 100"));
    assert!(summary.contains("filtered: 10"));
    assert!(summary.contains("2.00 KB"));
}
