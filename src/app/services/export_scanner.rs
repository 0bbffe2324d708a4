//! Export scanner for discovering MLS cell export files
//!
//! This module scans a download directory for MLS full cell export files,
//! parses the export vintage out of each filename, and selects the newest
//! export for processing. Files whose names carry no parsable vintage fall
//! back to their filesystem modification time for ordering.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::{EXPORT_FILE_PATTERN, EXPORT_VINTAGE_FORMAT, EXPORT_VINTAGE_REGEX};
use crate::{Error, Result};

/// Information about a discovered export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFileInfo {
    /// Full path to the export file
    pub path: PathBuf,
    /// Export vintage parsed from the filename
    pub vintage: Option<NaiveDateTime>,
    /// Filesystem modification time, the ordering fallback
    pub modified: NaiveDateTime,
    /// File size in bytes
    pub size_bytes: u64,
}

impl ExportFileInfo {
    /// Get the base filename without path
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }

    /// The timestamp this file sorts by
    pub fn effective_vintage(&self) -> NaiveDateTime {
        self.vintage.unwrap_or(self.modified)
    }

    /// Human-readable vintage for selection tables
    pub fn vintage_label(&self) -> String {
        match self.vintage {
            Some(vintage) => vintage.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("modified {}", self.modified.format("%Y-%m-%d %H:%M:%S")),
        }
    }

    /// Get estimated record count based on file size (rough approximation)
    pub fn estimated_record_count(&self) -> usize {
        // Rough estimate: 100 bytes per export record average
        (self.size_bytes / 100) as usize
    }
}

/// Configuration for export scanning
#[derive(Debug, Clone)]
pub struct ExportScanConfig {
    /// Glob pattern export filenames must match
    pub pattern: String,
    /// Whether to descend into subdirectories
    pub recursive: bool,
}

impl Default for ExportScanConfig {
    fn default() -> Self {
        Self {
            pattern: EXPORT_FILE_PATTERN.to_string(),
            recursive: false,
        }
    }
}

/// Scanner for discovering MLS export files
pub struct ExportScanner {
    config: ExportScanConfig,
}

impl ExportScanner {
    /// Create a new export scanner with default configuration
    pub fn new() -> Self {
        Self {
            config: ExportScanConfig::default(),
        }
    }

    /// Create a new export scanner with custom configuration
    pub fn with_config(config: ExportScanConfig) -> Self {
        Self { config }
    }

    /// Scan a directory for export files, newest first
    ///
    /// Ties on the effective vintage are broken by path so repeated scans
    /// return the same order.
    pub fn scan(&self, export_dir: &Path) -> Result<Vec<ExportFileInfo>> {
        info!("Scanning for exports in: {}", export_dir.display());

        if !export_dir.exists() {
            return Err(Error::file_not_found(export_dir.display().to_string()));
        }

        let pattern = Pattern::new(&self.config.pattern).map_err(|e| {
            Error::configuration(format!(
                "Invalid export file pattern '{}': {}",
                self.config.pattern, e
            ))
        })?;
        let vintage_regex = Regex::new(EXPORT_VINTAGE_REGEX).map_err(|e| {
            Error::configuration(format!("Invalid vintage pattern: {}", e))
        })?;

        let mut walker = WalkDir::new(export_dir).follow_links(false);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let filename = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            if !pattern.matches(&filename) {
                debug!("Skipping non-export file: {}", filename);
                continue;
            }

            let metadata = entry.metadata()?;
            let modified = metadata
                .modified()
                .map(|time| DateTime::<Utc>::from(time).naive_utc())
                .map_err(|e| Error::io("Failed to read file modification time".to_string(), e))?;

            files.push(ExportFileInfo {
                path: path.to_path_buf(),
                vintage: parse_vintage(&vintage_regex, &filename),
                modified,
                size_bytes: metadata.len(),
            });
        }

        files.sort_by(|a, b| {
            b.effective_vintage()
                .cmp(&a.effective_vintage())
                .then_with(|| a.path.cmp(&b.path))
        });

        info!("Discovered {} export files", files.len());
        Ok(files)
    }

    /// Return the newest export in a directory
    pub fn latest(&self, export_dir: &Path) -> Result<ExportFileInfo> {
        let mut files = self.scan(export_dir)?;
        if files.is_empty() {
            return Err(Error::file_not_found(format!(
                "{} (no files matching '{}')",
                export_dir.display(),
                self.config.pattern
            )));
        }
        Ok(files.remove(0))
    }
}

impl Default for ExportScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the export vintage out of a filename
fn parse_vintage(vintage_regex: &Regex, filename: &str) -> Option<NaiveDateTime> {
    let captures = vintage_regex.captures(filename)?;
    let date = captures.get(1)?.as_str();
    let time = captures.get(2)?.as_str();
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), EXPORT_VINTAGE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn vintage_regex() -> Regex {
        Regex::new(EXPORT_VINTAGE_REGEX).unwrap()
    }

    #[test]
    fn test_parse_vintage_from_filename() {
        let parsed = parse_vintage(&vintage_regex(), "MLS-full-cell-export-2023-08-16T000000.csv");
        let expected = NaiveDate::from_ymd_opt(2023, 8, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parsed, Some(expected));

        let afternoon =
            parse_vintage(&vintage_regex(), "MLS-full-cell-export-2024-01-02T153000.csv");
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        assert_eq!(afternoon, Some(expected));
    }

    #[test]
    fn test_parse_vintage_rejects_malformed_names() {
        assert_eq!(parse_vintage(&vintage_regex(), "MLS-full-cell-export.csv"), None);
        assert_eq!(parse_vintage(&vintage_regex(), "cells.csv"), None);
        // Matching shape but impossible date
        assert_eq!(
            parse_vintage(&vintage_regex(), "MLS-full-cell-export-2023-13-40T000000.csv"),
            None
        );
    }

    #[test]
    fn test_scan_keeps_only_matching_top_level_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("MLS-full-cell-export-2023-08-16T000000.csv"),
            "radio,mcc\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "unrelated").unwrap();
        fs::write(temp_dir.path().join("cells.csv"), "also unrelated").unwrap();

        // A matching file below a subdirectory is out of scope by default
        let nested = temp_dir.path().join("archive");
        fs::create_dir(&nested).unwrap();
        fs::write(
            nested.join("MLS-full-cell-export-2022-01-01T000000.csv"),
            "radio,mcc\n",
        )
        .unwrap();

        let scanner = ExportScanner::new();
        let files = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0].filename(),
            "MLS-full-cell-export-2023-08-16T000000.csv"
        );
    }

    #[test]
    fn test_recursive_scan_descends() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("archive");
        fs::create_dir(&nested).unwrap();
        fs::write(
            nested.join("MLS-full-cell-export-2022-01-01T000000.csv"),
            "radio,mcc\n",
        )
        .unwrap();

        let scanner = ExportScanner::with_config(ExportScanConfig {
            recursive: true,
            ..Default::default()
        });
        let files = scanner.scan(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_latest_picks_newest_vintage() {
        let temp_dir = TempDir::new().unwrap();
        for name in [
            "MLS-full-cell-export-2023-08-16T000000.csv",
            "MLS-full-cell-export-2023-09-01T120000.csv",
            "MLS-full-cell-export-2022-12-31T235959.csv",
        ] {
            fs::write(temp_dir.path().join(name), "radio,mcc\n").unwrap();
        }

        let latest = ExportScanner::new().latest(temp_dir.path()).unwrap();
        assert_eq!(latest.filename(), "MLS-full-cell-export-2023-09-01T120000.csv");
    }

    #[test]
    fn test_unvintaged_file_falls_back_to_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("MLS-full-cell-export-2023-08-16T000000.csv"),
            "radio,mcc\n",
        )
        .unwrap();
        // Matches the glob but carries no vintage; its mtime is now,
        // which is after any dated export fixture
        fs::write(
            temp_dir.path().join("MLS-full-cell-export-manual.csv"),
            "radio,mcc\n",
        )
        .unwrap();

        let scanner = ExportScanner::new();
        let files = scanner.scan(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename(), "MLS-full-cell-export-manual.csv");
        assert!(files[0].vintage.is_none());
        assert!(files[0].vintage_label().starts_with("modified "));
        assert_eq!(files[1].vintage_label(), "2023-08-16 00:00:00");
    }

    #[test]
    fn test_empty_scan_is_file_not_found_for_latest() {
        let temp_dir = TempDir::new().unwrap();
        let result = ExportScanner::new().latest(temp_dir.path());
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_missing_directory_errors() {
        let result = ExportScanner::new().scan(Path::new("/nonexistent/exports"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_estimated_record_count_scales_with_size() {
        let info = ExportFileInfo {
            path: PathBuf::from("MLS-full-cell-export-2023-08-16T000000.csv"),
            vintage: None,
            modified: Utc::now().naive_utc(),
            size_bytes: 50_000,
        };
        assert_eq!(info.estimated_record_count(), 500);
    }
}
